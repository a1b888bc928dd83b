//! GitHub credential resolution
//!
//! The service reads its token exactly once at startup and hands it to
//! [`crate::OctocrabClient::connect`]; nothing reads the environment later.

use crate::DEFAULT_HOST;
use log::debug;
use thiserror::Error;

/// No usable token was found for a host
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "no GitHub token found for host '{host}'. \
     Set {env_key} (or GITHUB_TOKEN for github.com) or run 'gh auth login --hostname {host}'"
)]
pub struct MissingToken {
    pub host: String,
    pub env_key: String,
}

/// Resolves GitHub tokens for a host
///
/// Tries multiple sources in order:
/// 1. Host-specific env var (e.g., `GITHUB_TOKEN_GHE_EXAMPLE_COM`)
/// 2. Generic `GITHUB_TOKEN` or `GH_TOKEN` (github.com only)
/// 3. `gh auth token --hostname {host}` command
#[derive(Debug, Clone)]
pub struct TokenResolver {
    /// Cached default token from GITHUB_TOKEN/GH_TOKEN
    default_token: Option<String>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenResolver {
    /// Create a new token resolver reading the generic token variables
    pub fn new() -> Self {
        let default_token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .ok()
            .filter(|t| !t.trim().is_empty());

        Self { default_token }
    }

    /// Create a resolver with an explicit default token
    pub fn with_default_token(default_token: Option<String>) -> Self {
        Self { default_token }
    }

    /// Get a token for the given host (None = github.com)
    pub async fn get_token(&self, host: Option<&str>) -> Result<String, MissingToken> {
        let host = host.unwrap_or(DEFAULT_HOST);
        let env_key = host_env_key(host);

        if let Ok(token) = std::env::var(&env_key) {
            if !token.trim().is_empty() {
                debug!("Using token from env var {} for host {}", env_key, host);
                return Ok(token);
            }
        }

        if host == DEFAULT_HOST {
            if let Some(ref token) = self.default_token {
                debug!("Using default token (GITHUB_TOKEN/GH_TOKEN) for github.com");
                return Ok(token.clone());
            }
        }

        if let Some(token) = gh_cli_token(host).await {
            debug!("Using token from gh CLI for host {}", host);
            return Ok(token);
        }

        Err(MissingToken {
            host: host.to_string(),
            env_key,
        })
    }
}

/// Env var name holding a host-specific token
fn host_env_key(host: &str) -> String {
    format!(
        "GITHUB_TOKEN_{}",
        host.replace(['.', '-'], "_").to_uppercase()
    )
}

/// Ask the gh CLI for a token; any failure just means "no token here"
async fn gh_cli_token(host: &str) -> Option<String> {
    debug!("Trying gh auth token for host {}", host);
    let output = tokio::process::Command::new("gh")
        .args(["auth", "token", "--hostname", host])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!token.is_empty()).then_some(token)
}

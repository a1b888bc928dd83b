//! Application configuration
//!
//! Configuration loaded from .gh-dead-code.toml, then overridden by
//! `BIND_ADDRESS`, `PORT` and `GITHUB_HOST` from the environment.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application configuration loaded from .gh-dead-code.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Address the HTTP listener binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port the HTTP listener binds to
    #[serde(default = "default_port")]
    pub port: u16,

    /// GitHub host; anything but github.com is treated as GitHub Enterprise
    #[serde(default = "default_github_host")]
    pub github_host: String,

    /// Connect/read timeout for every GitHub call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Prefix of generated removal branches
    #[serde(default = "default_branch_prefix")]
    pub branch_prefix: String,

    /// Title of removal pull requests, also the commit subject
    #[serde(default = "default_pull_request_title")]
    pub pull_request_title: String,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Settings handed to the analysis engine
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Files larger than this (bytes) are not analyzed
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Skip test files and directories
    #[serde(default = "default_skip_tests")]
    pub skip_tests: bool,

    /// Substring patterns excluded on top of the built-in ones
    #[serde(default)]
    pub extra_ignore_patterns: Vec<String>,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_github_host() -> String {
    gh_client::DEFAULT_HOST.to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_branch_prefix() -> String {
    "dead-code-removal-".to_string()
}

fn default_pull_request_title() -> String {
    "chore: remove dead code".to_string()
}

fn default_max_file_size() -> u64 {
    1_000_000
}

fn default_skip_tests() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            skip_tests: default_skip_tests(),
            extra_ignore_patterns: Vec::new(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            github_host: default_github_host(),
            request_timeout_secs: default_request_timeout_secs(),
            branch_prefix: default_branch_prefix(),
            pull_request_title: default_pull_request_title(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults,
    /// then apply environment overrides
    pub fn load() -> Self {
        let mut config = Self::from_file();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    fn from_file() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Apply `BIND_ADDRESS`, `PORT` and `GITHUB_HOST` from `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("BIND_ADDRESS").filter(|v| !v.is_empty()) {
            self.bind_address = addr;
        }

        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => log::warn!("Ignoring invalid PORT value '{}'", port),
            }
        }

        if let Some(host) = lookup("GITHUB_HOST").filter(|v| !v.is_empty()) {
            self.github_host = host;
        }
    }

    /// Socket address string for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Enterprise host, or None for github.com
    pub fn enterprise_host(&self) -> Option<&str> {
        Some(self.github_host.as_str()).filter(|h| *h != gh_client::DEFAULT_HOST)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.listen_addr(), "0.0.0.0:8000");
        assert_eq!(config.github_host, "github.com");
        assert_eq!(config.enterprise_host(), None);
        assert_eq!(config.branch_prefix, "dead-code-removal-");
        assert_eq!(config.pull_request_title, "chore: remove dead code");
        assert_eq!(config.analysis.max_file_size, 1_000_000);
        assert!(config.analysis.skip_tests);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            port = 9000
            github_host = "ghe.example.com"

            [analysis]
            extra_ignore_patterns = ["generated/"]
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.enterprise_host(), Some("ghe.example.com"));
        assert_eq!(config.analysis.extra_ignore_patterns, vec!["generated/"]);
        // Untouched fields should use defaults
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.analysis.max_file_size, 1_000_000);
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("BIND_ADDRESS", "127.0.0.1"),
            ("PORT", "3000"),
            ("GITHUB_HOST", "git.corp.com"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.listen_addr(), "127.0.0.1:3000");
        assert_eq!(config.enterprise_host(), Some("git.corp.com"));
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert_eq!(config.port, 8000);
    }
}

//! Credentials read once at startup
//!
//! A token is mandatory: without one the service refuses to start instead
//! of failing on the first request.

use anyhow::{Context, Result};
use gh_client::{CommitAuthor, TokenResolver};

/// Process-wide, immutable GitHub credentials
#[derive(Clone)]
pub struct Credentials {
    /// Token used for every GitHub call
    pub token: String,

    /// Author recorded on removal commits (GITHUB_USERNAME + GITHUB_EMAIL)
    pub commit_author: Option<CommitAuthor>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("commit_author", &self.commit_author)
            .finish()
    }
}

impl Credentials {
    /// Resolve the token for `host` from the environment
    ///
    /// Expects `.env` to be merged already, see [`crate::load_env_file`].
    pub async fn load(host: Option<&str>) -> Result<Self> {
        let token = TokenResolver::new()
            .get_token(host)
            .await
            .context("GitHub token is required")?;

        let commit_author = commit_author_from(|key| std::env::var(key).ok());
        if commit_author.is_none() {
            log::info!("GITHUB_USERNAME/GITHUB_EMAIL not set, commits use the token owner");
        }

        Ok(Self {
            token,
            commit_author,
        })
    }
}

fn commit_author_from(lookup: impl Fn(&str) -> Option<String>) -> Option<CommitAuthor> {
    let name = lookup("GITHUB_USERNAME").filter(|v| !v.trim().is_empty())?;
    let email = lookup("GITHUB_EMAIL").filter(|v| !v.trim().is_empty())?;
    Some(CommitAuthor { name, email })
}

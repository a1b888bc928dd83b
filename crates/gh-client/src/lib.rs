//! GitHub API client for the dead code service
//!
//! This crate provides the narrow, trait-based view of GitHub that the
//! service needs: reading a repository snapshot, and the branch / commit /
//! pull request workflow used to land a removal.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐   ┌──────────────────────────────┐
//! │   VersionControlHost trait   │   │ RepositoryArchiveSource trait│
//! │  - default_branch_head()     │   │  - download_archive()        │
//! │  - create_branch()           │   └──────────────────────────────┘
//! │  - file_content()            │                  │
//! │  - commit_changes()          │                  │
//! │  - open_pull_request()       │                  │
//! └──────────────────────────────┘                  │
//!                 │                                 │
//!                 └───────────────┬─────────────────┘
//!                                 ▼
//!                      ┌─────────────────────┐
//!                      │   OctocrabClient    │
//!                      │   (direct API)      │
//!                      └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{OctocrabClient, TokenResolver, VersionControlHost};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let token = TokenResolver::new().get_token(None).await?;
//! let client = OctocrabClient::connect(None, token, Duration::from_secs(60))?;
//!
//! let head = client.default_branch_head("acme", "widgets").await?;
//! println!("{} @ {}", head.name, head.sha);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod octocrab_client;
pub mod token;
pub mod types;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use client::{RepositoryArchiveSource, VersionControlHost};
pub use error::HostError;
pub use octocrab_client::OctocrabClient;
pub use token::{MissingToken, TokenResolver};
pub use types::{
    BranchHead, CommitAuthor, CreatedPullRequest, FileChange, NewPullRequest, RepositoryArchive,
};

/// Base URL of the REST API for a host (None = github.com)
pub fn api_base_url(host: Option<&str>) -> String {
    match host {
        Some(h) if h != DEFAULT_HOST && !h.is_empty() => format!("https://{}/api/v3", h),
        _ => "https://api.github.com".to_string(),
    }
}

//! GitHub API data transfer objects
//!
//! These types cross the `VersionControlHost` boundary.
//! They are intentionally separate from the service's response schema
//! to keep this crate pure and reusable.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A branch name and the commit it currently points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchHead {
    /// Branch name (e.g., "main")
    pub name: String,

    /// Commit SHA
    pub sha: String,
}

/// New content for one file in a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Path relative to the repository root
    pub path: String,

    /// Full file content after the change
    pub content: String,
}

/// Name and email recorded as commit author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

/// Parameters for opening a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    /// PR title
    pub title: String,

    /// PR body (markdown)
    pub body: String,

    /// Branch containing the changes
    pub head: String,

    /// Branch the changes should be merged into
    pub base: String,
}

/// A pull request as returned after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedPullRequest {
    /// PR number (e.g., 123)
    pub number: u64,

    /// PR URL for opening in browser
    pub html_url: String,
}

/// Zip archive of a repository at a known commit
#[derive(Debug, Clone)]
pub struct RepositoryArchive {
    /// Branch and commit the archive was taken from
    pub head: BranchHead,

    /// Raw zip bytes as served by GitHub
    pub bytes: Bytes,
}

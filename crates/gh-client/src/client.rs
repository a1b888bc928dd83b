//! GitHub host traits
//!
//! This module defines the two seams the service talks to GitHub through.
//! Both are object safe so the server can hold them as `Arc<dyn _>` and
//! tests can swap in fakes without any network access.

use crate::error::HostError;
use crate::types::{
    BranchHead, CommitAuthor, CreatedPullRequest, FileChange, NewPullRequest, RepositoryArchive,
};
use async_trait::async_trait;

/// Branch, commit and pull request operations on a hosted repository
///
/// Every call is a single attempt. Nothing here rolls back on failure:
/// a branch created by `create_branch` stays in place if a later step fails.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// request handlers.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{HostError, VersionControlHost};
///
/// async fn fork_point(host: &dyn VersionControlHost) -> Result<String, HostError> {
///     Ok(host.default_branch_head("rust-lang", "rust").await?.sha)
/// }
/// ```
#[async_trait]
pub trait VersionControlHost: Send + Sync {
    /// Resolve the default branch and the commit it points at
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner (user or organization)
    /// * `repo` - Repository name
    async fn default_branch_head(&self, owner: &str, repo: &str) -> Result<BranchHead, HostError>;

    /// Create `branch` pointing at `from_sha`
    ///
    /// Fails if the branch already exists.
    async fn create_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        from_sha: &str,
    ) -> Result<(), HostError>;

    /// Read a UTF-8 file at the given branch, tag or commit
    async fn file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<String, HostError>;

    /// Write all `changes` to `branch` as one commit
    ///
    /// # Arguments
    ///
    /// * `branch` - Branch to advance; its current head becomes the parent
    /// * `message` - Full commit message
    /// * `changes` - New contents of each touched file
    /// * `author` - Commit author, or None to let GitHub use the token owner
    ///
    /// # Returns
    ///
    /// SHA of the new commit
    async fn commit_changes(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        message: &str,
        changes: &[FileChange],
        author: Option<&CommitAuthor>,
    ) -> Result<String, HostError>;

    /// Open a pull request
    async fn open_pull_request(
        &self,
        owner: &str,
        repo: &str,
        request: &NewPullRequest,
    ) -> Result<CreatedPullRequest, HostError>;
}

/// Read-only access to a full repository snapshot
#[async_trait]
pub trait RepositoryArchiveSource: Send + Sync {
    /// Download a zip archive of the default branch head
    ///
    /// The archive is taken at the exact commit reported in
    /// [`RepositoryArchive::head`], so the listing is stable for that commit.
    async fn download_archive(&self, owner: &str, repo: &str)
        -> Result<RepositoryArchive, HostError>;
}

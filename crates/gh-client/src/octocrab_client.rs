//! Octocrab-based GitHub API client
//!
//! Direct implementation of the host traits using the octocrab library.
//! Commits go through the git data API so that any number of file
//! changes land as a single commit. Archive downloads use a plain
//! `reqwest` client because the zipball endpoint answers with a redirect
//! to a binary payload.

use crate::client::{RepositoryArchiveSource, VersionControlHost};
use crate::error::HostError;
use crate::types::{
    BranchHead, CommitAuthor, CreatedPullRequest, FileChange, NewPullRequest, RepositoryArchive,
};
use async_trait::async_trait;
use log::{debug, info, warn};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("gh-dead-code/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct GitRef {
    object: GitObject,
}

#[derive(Debug, Deserialize)]
struct GitObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GitTree {
    #[serde(default)]
    tree: Vec<GitTreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct GitTreeEntry {
    path: String,
    mode: String,
}

/// Blob mode for files that are new or missing from the base tree
const DEFAULT_FILE_MODE: &str = "100644";

#[derive(Debug, Deserialize)]
struct GitCommit {
    sha: String,
    tree: GitObject,
}

/// Direct GitHub API client using octocrab
///
/// Makes actual API calls with a single attempt per call.
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
    http: reqwest::Client,
    base_url: String,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance and a download client
    pub fn new(octocrab: Arc<Octocrab>, http: reqwest::Client, base_url: String) -> Self {
        Self {
            octocrab,
            http,
            base_url,
        }
    }

    /// Build an authenticated client for `host` (None = github.com)
    ///
    /// Connect and read timeouts are bounded by `timeout`; octocrab's
    /// built-in retry layer is switched off.
    pub fn connect(host: Option<&str>, token: String, timeout: Duration) -> Result<Self, HostError> {
        let base_url = crate::api_base_url(host);
        info!("Creating GitHub client for {}", base_url);

        let octocrab = Octocrab::builder()
            .personal_token(token.clone())
            .add_retry_config(RetryConfig::None)
            .set_connect_timeout(Some(timeout))
            .set_read_timeout(Some(timeout))
            .base_uri(base_url.as_str())?
            .build()?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| HostError::InvalidResponse(format!("invalid token: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self::new(Arc::new(octocrab), http, base_url))
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }

    /// REST API base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn branch_sha(&self, owner: &str, repo: &str, branch: &str) -> Result<String, HostError> {
        let route = format!("/repos/{}/{}/git/ref/heads/{}", owner, repo, branch);
        let git_ref: GitRef = self.octocrab.get(route, None::<&()>).await?;
        Ok(git_ref.object.sha)
    }

    /// Mode of every blob in a tree, keyed by path
    async fn file_modes(
        &self,
        owner: &str,
        repo: &str,
        tree_sha: &str,
    ) -> Result<HashMap<String, String>, HostError> {
        let route = format!("/repos/{}/{}/git/trees/{}", owner, repo, tree_sha);
        let tree: GitTree = self
            .octocrab
            .get(route, Some(&[("recursive", "1")]))
            .await?;
        if tree.truncated {
            warn!(
                "Tree {} of {}/{} is truncated, missing files get mode {}",
                tree_sha, owner, repo, DEFAULT_FILE_MODE
            );
        }
        Ok(tree.tree.into_iter().map(|e| (e.path, e.mode)).collect())
    }
}

#[async_trait]
impl VersionControlHost for OctocrabClient {
    async fn default_branch_head(&self, owner: &str, repo: &str) -> Result<BranchHead, HostError> {
        debug!("Resolving default branch for {}/{}", owner, repo);

        let repository = self.octocrab.repos(owner, repo).get().await?;
        let name = repository.default_branch.ok_or_else(|| {
            HostError::InvalidResponse(format!("{}/{} has no default branch", owner, repo))
        })?;
        let sha = self.branch_sha(owner, repo, &name).await?;

        debug!("Default branch of {}/{} is {} @ {}", owner, repo, name, sha);
        Ok(BranchHead { name, sha })
    }

    async fn create_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        from_sha: &str,
    ) -> Result<(), HostError> {
        debug!("Creating branch {} on {}/{} at {}", branch, owner, repo, from_sha);

        let route = format!("/repos/{}/{}/git/refs", owner, repo);
        let body = json!({
            "ref": format!("refs/heads/{}", branch),
            "sha": from_sha,
        });
        let _: serde_json::Value = self.octocrab.post(route, Some(&body)).await?;
        Ok(())
    }

    async fn file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<String, HostError> {
        debug!("Fetching {} from {}/{} @ {}", path, owner, repo, git_ref);

        let items = self
            .octocrab
            .repos(owner, repo)
            .get_content()
            .path(path)
            .r#ref(git_ref)
            .send()
            .await?;

        let item = items
            .items
            .into_iter()
            .next()
            .ok_or_else(|| HostError::NotFound(format!("{} in {}/{}", path, owner, repo)))?;

        item.decoded_content()
            .ok_or_else(|| HostError::InvalidResponse(format!("{} is not a text file", path)))
    }

    async fn commit_changes(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        message: &str,
        changes: &[FileChange],
        author: Option<&CommitAuthor>,
    ) -> Result<String, HostError> {
        debug!(
            "Committing {} file(s) to {}/{} on {}",
            changes.len(),
            owner,
            repo,
            branch
        );

        let parent_sha = self.branch_sha(owner, repo, branch).await?;
        let parent: GitCommit = self
            .octocrab
            .get(
                format!("/repos/{}/{}/git/commits/{}", owner, repo, parent_sha),
                None::<&()>,
            )
            .await?;

        let modes = self.file_modes(owner, repo, &parent.tree.sha).await?;
        let entries = tree_entries(changes, &modes);
        let tree: GitObject = self
            .octocrab
            .post(
                format!("/repos/{}/{}/git/trees", owner, repo),
                Some(&json!({ "base_tree": parent.tree.sha, "tree": entries })),
            )
            .await?;

        let mut commit_body = json!({
            "message": message,
            "tree": tree.sha,
            "parents": [parent.sha],
        });
        if let Some(author) = author {
            commit_body["author"] = json!({ "name": author.name, "email": author.email });
        }
        let commit: GitObject = self
            .octocrab
            .post(
                format!("/repos/{}/{}/git/commits", owner, repo),
                Some(&commit_body),
            )
            .await?;

        let _: serde_json::Value = self
            .octocrab
            .patch(
                format!("/repos/{}/{}/git/refs/heads/{}", owner, repo, branch),
                Some(&json!({ "sha": commit.sha, "force": false })),
            )
            .await?;

        debug!("Created commit {} on {}/{}:{}", commit.sha, owner, repo, branch);
        Ok(commit.sha)
    }

    async fn open_pull_request(
        &self,
        owner: &str,
        repo: &str,
        request: &NewPullRequest,
    ) -> Result<CreatedPullRequest, HostError> {
        debug!(
            "Opening PR {} -> {} on {}/{}",
            request.head, request.base, owner, repo
        );

        let pr = self
            .octocrab
            .pulls(owner, repo)
            .create(&request.title, &request.head, &request.base)
            .body(&request.body)
            .send()
            .await?;

        Ok(CreatedPullRequest {
            number: pr.number,
            html_url: pr
                .html_url
                .as_ref()
                .map(|u| u.to_string())
                .unwrap_or_default(),
        })
    }
}

#[async_trait]
impl RepositoryArchiveSource for OctocrabClient {
    async fn download_archive(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryArchive, HostError> {
        let head = self.default_branch_head(owner, repo).await?;
        let url = zipball_url(&self.base_url, owner, repo, &head.sha);
        debug!("Downloading archive {}", url);

        let bytes = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        info!(
            "Downloaded {}/{} @ {} ({} bytes)",
            owner,
            repo,
            head.sha,
            bytes.len()
        );
        Ok(RepositoryArchive { head, bytes })
    }
}

/// Tree entries for `changes`, keeping each file's mode from the base tree
fn tree_entries(changes: &[FileChange], modes: &HashMap<String, String>) -> Vec<serde_json::Value> {
    changes
        .iter()
        .map(|change| {
            let mode = modes
                .get(&change.path)
                .map(String::as_str)
                .filter(|m| matches!(*m, "100644" | "100755"))
                .unwrap_or(DEFAULT_FILE_MODE);
            json!({
                "path": change.path,
                "mode": mode,
                "type": "blob",
                "content": change.content,
            })
        })
        .collect()
}

fn zipball_url(base_url: &str, owner: &str, repo: &str, sha: &str) -> String {
    format!(
        "{}/repos/{}/{}/zipball/{}",
        base_url.trim_end_matches('/'),
        owner,
        repo,
        sha
    )
}

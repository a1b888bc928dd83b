//! PR Workflow Driver
//!
//! Lands the removal of dead symbols as a pull request:
//!
//! 1. create a uniquely named branch from the default branch head
//! 2. cut every removable definition out of its file
//! 3. commit all edited files at once
//! 4. open a pull request listing what was removed
//!
//! Nothing is rolled back when a later step fails; a branch created before a
//! failed commit stays on the remote.

use crate::error::ServiceError;
use crate::removal::remove_symbols;
use crate::schema::{DeadSymbol, PullRequestResult, RepositoryReference, SymbolType};
use chrono::Utc;
use gh_client::{CommitAuthor, FileChange, NewPullRequest, VersionControlHost};
use gh_dead_code_engine::SourceLanguage;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates branch names that never repeat within the process
///
/// `<prefix><UTC timestamp with millis>-<sequence>`; the sequence keeps two
/// calls in the same millisecond apart.
#[derive(Debug)]
pub struct BranchNamer {
    prefix: String,
    sequence: AtomicU64,
}

impl BranchNamer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn next_name(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!(
            "{}{}-{}",
            self.prefix,
            Utc::now().format("%Y%m%d%H%M%S%3f"),
            seq
        )
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// PR title, also the commit subject
    pub pull_request_title: String,
    /// Commit author; None lets GitHub use the token owner
    pub commit_author: Option<CommitAuthor>,
}

pub struct PrWorkflowDriver {
    host: Arc<dyn VersionControlHost>,
    namer: BranchNamer,
    settings: WorkflowSettings,
}

impl PrWorkflowDriver {
    pub fn new(
        host: Arc<dyn VersionControlHost>,
        namer: BranchNamer,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            host,
            namer,
            settings,
        }
    }

    /// Open a pull request removing `symbols` from `repo`
    ///
    /// `removed_items` of the result only lists the symbols actually cut,
    /// in the order they were given.
    pub async fn create_removal_pr(
        &self,
        repo: &RepositoryReference,
        symbols: &[DeadSymbol],
    ) -> Result<PullRequestResult, ServiceError> {
        if symbols.is_empty() {
            return Err(ServiceError::Validation(
                "no dead symbols to remove".to_string(),
            ));
        }

        let branch = self.namer.next_name();
        let (owner, name) = (repo.owner.as_str(), repo.repo.as_str());

        let base = self
            .host
            .default_branch_head(owner, name)
            .await
            .map_err(|e| ServiceError::BranchCreation {
                branch: branch.clone(),
                reason: e.to_string(),
            })?;
        self.host
            .create_branch(owner, name, &branch, &base.sha)
            .await
            .map_err(|e| ServiceError::BranchCreation {
                branch: branch.clone(),
                reason: e.to_string(),
            })?;
        info!("Created branch {} on {} from {}", branch, repo, base.sha);

        let commit_failure = |reason: String| ServiceError::Commit {
            branch: branch.clone(),
            reason,
        };

        let mut by_file: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (index, symbol) in symbols.iter().enumerate() {
            by_file.entry(symbol.file_path.as_str()).or_default().push(index);
        }

        let mut removed = vec![false; symbols.len()];
        let mut changes = Vec::new();
        for (path, indices) in &by_file {
            let content = self
                .host
                .file_content(owner, name, path, &branch)
                .await
                .map_err(|e| commit_failure(format!("could not read {}: {}", path, e)))?;

            let targets: Vec<&DeadSymbol> = indices.iter().map(|&i| &symbols[i]).collect();
            let edit = remove_symbols(&content, &targets);
            debug!(
                "{}: removed {}, skipped {}",
                path,
                edit.removed.len(),
                edit.skipped.len()
            );

            if edit.changed() {
                for local in &edit.removed {
                    removed[indices[*local]] = true;
                }
                changes.push(FileChange {
                    path: path.to_string(),
                    content: edit.content,
                });
            }
        }

        let removed_symbols: Vec<&DeadSymbol> = symbols
            .iter()
            .zip(&removed)
            .filter_map(|(symbol, &done)| done.then_some(symbol))
            .collect();
        if removed_symbols.is_empty() {
            return Err(commit_failure(format!(
                "none of the {} dead symbols could be removed",
                symbols.len()
            )));
        }
        if removed_symbols.len() < symbols.len() {
            warn!(
                "Removing {} of {} dead symbols from {}",
                removed_symbols.len(),
                symbols.len(),
                repo
            );
        }

        let removed_items: Vec<String> = removed_symbols.iter().map(|s| s.describe()).collect();
        let message = commit_message(&self.settings.pull_request_title, &removed_items);
        let sha = self
            .host
            .commit_changes(
                owner,
                name,
                &branch,
                &message,
                &changes,
                self.settings.commit_author.as_ref(),
            )
            .await
            .map_err(|e| commit_failure(e.to_string()))?;
        info!("Committed {} file(s) to {} as {}", changes.len(), branch, sha);

        let request = NewPullRequest {
            title: self.settings.pull_request_title.clone(),
            body: pull_request_body(&removed_symbols),
            head: branch.clone(),
            base: base.name,
        };
        let pr = self
            .host
            .open_pull_request(owner, name, &request)
            .await
            .map_err(|e| ServiceError::PullRequestCreation {
                branch: branch.clone(),
                reason: e.to_string(),
            })?;
        info!("Opened pull request #{} on {}: {}", pr.number, repo, pr.html_url);

        Ok(PullRequestResult {
            pr_url: pr.html_url,
            branch_name: branch,
            removed_items,
        })
    }
}

fn commit_message(title: &str, removed_items: &[String]) -> String {
    let mut message = format!("{}\n\n", title);
    for item in removed_items {
        let _ = writeln!(message, "- {}", item);
    }
    message
}

fn pull_request_body(removed: &[&DeadSymbol]) -> String {
    let mut body = String::from("## Dead code removal\n\n");
    let _ = writeln!(
        body,
        "This pull request removes {} unused definition(s) found by static analysis.\n",
        removed.len()
    );
    for symbol in removed {
        let _ = writeln!(body, "- {}", symbol.describe());
    }

    for (heading, kind) in [
        ("Removed Functions", SymbolType::Function),
        ("Removed Classes", SymbolType::Class),
    ] {
        let section: Vec<&&DeadSymbol> = removed.iter().filter(|s| s.symbol_type == kind).collect();
        if section.is_empty() {
            continue;
        }

        let _ = writeln!(body, "\n### {}\n", heading);
        for symbol in section {
            let _ = writeln!(body, "#### `{}` in `{}`\n", symbol.symbol_name, symbol.file_path);
            if let Some(source) = &symbol.source_text {
                let fence = SourceLanguage::from_path(&symbol.file_path)
                    .map(SourceLanguage::fence_name)
                    .unwrap_or_default();
                let _ = writeln!(body, "```{}\n{}\n```\n", fence, source.trim_end());
            }
        }
    }

    body
}

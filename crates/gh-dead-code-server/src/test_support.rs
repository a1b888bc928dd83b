//! In-memory stand-ins for the engine and GitHub used across the tests

use async_trait::async_trait;
use gh_client::{
    BranchHead, CommitAuthor, CreatedPullRequest, FileChange, HostError, NewPullRequest,
    VersionControlHost,
};
use gh_dead_code_engine::{
    AnalysisOptions, EngineError, LanguageFamily, RepositoryAnalyzer, RepositorySnapshot,
    SymbolKind, SymbolRecord,
};
use std::collections::HashMap;
use std::sync::Mutex;

pub(crate) fn record(
    file_path: &str,
    name: &str,
    kind: SymbolKind,
    line: Option<u32>,
) -> SymbolRecord {
    SymbolRecord {
        file_path: file_path.to_string(),
        name: name.to_string(),
        kind,
        line,
        source: None,
    }
}

enum Outcome {
    Symbols(Vec<SymbolRecord>),
    Unavailable(HostError),
    Failure(String),
}

pub(crate) struct FakeAnalyzer {
    outcome: Outcome,
    opened: Mutex<Vec<String>>,
    languages: Mutex<Vec<Option<LanguageFamily>>>,
}

impl FakeAnalyzer {
    fn with(outcome: Outcome) -> Self {
        Self {
            outcome,
            opened: Mutex::new(Vec::new()),
            languages: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn returning(symbols: Vec<SymbolRecord>) -> Self {
        Self::with(Outcome::Symbols(symbols))
    }

    pub(crate) fn unavailable(err: HostError) -> Self {
        Self::with(Outcome::Unavailable(err))
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self::with(Outcome::Failure(message.to_string()))
    }

    /// Repositories passed to `open`, as `owner/repo`
    pub(crate) fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub(crate) fn last_language(&self) -> Option<LanguageFamily> {
        self.languages.lock().unwrap().last().copied().flatten()
    }
}

#[async_trait]
impl RepositoryAnalyzer for FakeAnalyzer {
    async fn open(
        &self,
        owner: &str,
        repo: &str,
        options: &AnalysisOptions,
    ) -> Result<RepositorySnapshot, EngineError> {
        let full_name = format!("{}/{}", owner, repo);
        self.opened.lock().unwrap().push(full_name.clone());
        self.languages.lock().unwrap().push(options.language);

        if let Outcome::Unavailable(err) = &self.outcome {
            return Err(EngineError::Unavailable {
                repository: full_name,
                source: err.clone(),
            });
        }

        Ok(RepositorySnapshot {
            owner: owner.to_string(),
            repo: repo.to_string(),
            head: BranchHead {
                name: "main".to_string(),
                sha: "abc123".to_string(),
            },
            files: Vec::new(),
        })
    }

    fn find_dead_symbols(
        &self,
        _snapshot: &RepositorySnapshot,
    ) -> Result<Vec<SymbolRecord>, EngineError> {
        match &self.outcome {
            Outcome::Symbols(symbols) => Ok(symbols.clone()),
            Outcome::Failure(message) => Err(EngineError::Internal(message.clone())),
            Outcome::Unavailable(_) => Err(EngineError::Internal("not opened".to_string())),
        }
    }
}

/// Workflow step a [`FakeHost`] can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostStep {
    DefaultBranch,
    CreateBranch,
    ReadFile,
    Commit,
    OpenPullRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedCommit {
    pub branch: String,
    pub message: String,
    pub changes: Vec<FileChange>,
    pub author: Option<CommitAuthor>,
}

#[derive(Default)]
pub(crate) struct FakeHost {
    files: HashMap<String, String>,
    fail_at: Option<HostStep>,
    pub branches: Mutex<Vec<(String, String)>>,
    pub commits: Mutex<Vec<RecordedCommit>>,
    pub pull_requests: Mutex<Vec<NewPullRequest>>,
}

impl FakeHost {
    pub(crate) fn with_files(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(path, content)| (path.to_string(), content.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    pub(crate) fn failing_at(mut self, step: HostStep) -> Self {
        self.fail_at = Some(step);
        self
    }

    fn check(&self, step: HostStep) -> Result<(), HostError> {
        if self.fail_at == Some(step) {
            return Err(HostError::Api {
                status: 422,
                message: format!("{:?} rejected", step),
            });
        }
        Ok(())
    }

    pub(crate) fn branch_names(&self) -> Vec<String> {
        self.branches
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[async_trait]
impl VersionControlHost for FakeHost {
    async fn default_branch_head(&self, _owner: &str, _repo: &str) -> Result<BranchHead, HostError> {
        self.check(HostStep::DefaultBranch)?;
        Ok(BranchHead {
            name: "main".to_string(),
            sha: "abc123".to_string(),
        })
    }

    async fn create_branch(
        &self,
        _owner: &str,
        _repo: &str,
        branch: &str,
        from_sha: &str,
    ) -> Result<(), HostError> {
        self.check(HostStep::CreateBranch)?;
        self.branches
            .lock()
            .unwrap()
            .push((branch.to_string(), from_sha.to_string()));
        Ok(())
    }

    async fn file_content(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        _git_ref: &str,
    ) -> Result<String, HostError> {
        self.check(HostStep::ReadFile)?;
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| HostError::NotFound(path.to_string()))
    }

    async fn commit_changes(
        &self,
        _owner: &str,
        _repo: &str,
        branch: &str,
        message: &str,
        changes: &[FileChange],
        author: Option<&CommitAuthor>,
    ) -> Result<String, HostError> {
        self.check(HostStep::Commit)?;
        self.commits.lock().unwrap().push(RecordedCommit {
            branch: branch.to_string(),
            message: message.to_string(),
            changes: changes.to_vec(),
            author: author.cloned(),
        });
        Ok("c0ffee".to_string())
    }

    async fn open_pull_request(
        &self,
        owner: &str,
        repo: &str,
        request: &NewPullRequest,
    ) -> Result<CreatedPullRequest, HostError> {
        self.check(HostStep::OpenPullRequest)?;
        let mut pull_requests = self.pull_requests.lock().unwrap();
        pull_requests.push(request.clone());
        let number = pull_requests.len() as u64;
        Ok(CreatedPullRequest {
            number,
            html_url: format!("https://github.com/{}/{}/pull/{}", owner, repo, number),
        })
    }
}

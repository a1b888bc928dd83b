//! Repository analyzer trait and its GitHub-backed implementation

use crate::archive::extract_source_files;
use crate::detector;
use crate::error::EngineError;
use crate::filter::FileFilter;
use crate::types::{AnalysisOptions, RepositorySnapshot, SymbolRecord};
use async_trait::async_trait;
use gh_client::RepositoryArchiveSource;
use log::info;

/// Opens repositories and finds their dead symbols
///
/// Split in two so the network-bound `open` can run on the async runtime
/// while the CPU-bound `find_dead_symbols` can be moved to a blocking pool.
#[async_trait]
pub trait RepositoryAnalyzer: Send + Sync {
    /// Fetch the repository and select the files to analyze
    ///
    /// Fails with [`EngineError::Unavailable`] when the repository cannot
    /// be read (missing, no access, network failure).
    async fn open(
        &self,
        owner: &str,
        repo: &str,
        options: &AnalysisOptions,
    ) -> Result<RepositorySnapshot, EngineError>;

    /// Unused functions and classes of an opened snapshot
    fn find_dead_symbols(
        &self,
        snapshot: &RepositorySnapshot,
    ) -> Result<Vec<SymbolRecord>, EngineError>;
}

/// Static settings for [`GitHubAnalyzer`]
#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub max_file_size: u64,
    pub skip_tests: bool,
    pub extra_ignore_patterns: Vec<String>,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        let filter = FileFilter::default();
        Self {
            max_file_size: filter.max_file_size,
            skip_tests: filter.skip_tests,
            extra_ignore_patterns: filter.extra_ignore_patterns,
        }
    }
}

/// Analyzer reading repositories as zip snapshots from GitHub
#[derive(Debug, Clone)]
pub struct GitHubAnalyzer<S> {
    source: S,
    settings: AnalyzerSettings,
}

impl<S: RepositoryArchiveSource> GitHubAnalyzer<S> {
    pub fn new(source: S, settings: AnalyzerSettings) -> Self {
        Self { source, settings }
    }

    fn filter(&self, options: &AnalysisOptions) -> FileFilter {
        FileFilter {
            max_file_size: self.settings.max_file_size,
            skip_tests: self.settings.skip_tests,
            extra_ignore_patterns: self.settings.extra_ignore_patterns.clone(),
            language: options.language,
        }
    }
}

#[async_trait]
impl<S: RepositoryArchiveSource> RepositoryAnalyzer for GitHubAnalyzer<S> {
    async fn open(
        &self,
        owner: &str,
        repo: &str,
        options: &AnalysisOptions,
    ) -> Result<RepositorySnapshot, EngineError> {
        let archive = self
            .source
            .download_archive(owner, repo)
            .await
            .map_err(|source| EngineError::Unavailable {
                repository: format!("{}/{}", owner, repo),
                source,
            })?;

        let files = extract_source_files(&archive.bytes, &self.filter(options))?;
        info!(
            "Opened {}/{} @ {} with {} files in scope",
            owner,
            repo,
            archive.head.sha,
            files.len()
        );

        Ok(RepositorySnapshot {
            owner: owner.to_string(),
            repo: repo.to_string(),
            head: archive.head,
            files,
        })
    }

    fn find_dead_symbols(
        &self,
        snapshot: &RepositorySnapshot,
    ) -> Result<Vec<SymbolRecord>, EngineError> {
        detector::find_dead_symbols(&snapshot.files)
    }
}

//! Analysis Invoker
//!
//! Thin adapter between the HTTP layer and the analysis engine: opens the
//! repository, runs detection off the async runtime and shapes the result.

use crate::error::ServiceError;
use crate::schema::{DeadSymbol, Language, RepositoryReference};
use gh_dead_code_engine::{AnalysisOptions, EngineError, RepositoryAnalyzer};
use log::{debug, info};
use std::sync::Arc;

#[derive(Clone)]
pub struct AnalysisInvoker {
    analyzer: Arc<dyn RepositoryAnalyzer>,
}

impl AnalysisInvoker {
    pub fn new(analyzer: Arc<dyn RepositoryAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Dead functions and classes of `repo`, in engine discovery order
    pub async fn analyze(
        &self,
        repo: &RepositoryReference,
        language: Option<Language>,
    ) -> Result<Vec<DeadSymbol>, ServiceError> {
        info!("Analyzing {}", repo);
        let options = AnalysisOptions {
            language: language.map(Language::family),
        };

        let snapshot = self
            .analyzer
            .open(&repo.owner, &repo.repo, &options)
            .await
            .map_err(engine_failure)?;
        debug!("{} opened with {} files", repo, snapshot.files.len());

        let analyzer = Arc::clone(&self.analyzer);
        let records = tokio::task::spawn_blocking(move || analyzer.find_dead_symbols(&snapshot))
            .await
            .map_err(|e| ServiceError::AnalysisEngine(format!("analysis worker failed: {}", e)))?
            .map_err(engine_failure)?;

        let symbols: Vec<DeadSymbol> = records.into_iter().map(DeadSymbol::from).collect();
        info!("Found {} dead symbols in {}", symbols.len(), repo);
        Ok(symbols)
    }
}

fn engine_failure(err: EngineError) -> ServiceError {
    match err {
        EngineError::Unavailable { repository, source } => {
            ServiceError::unavailable(repository, &source)
        }
        other => ServiceError::AnalysisEngine(other.to_string()),
    }
}

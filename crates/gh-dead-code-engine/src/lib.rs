//! Dead code analysis engine
//!
//! Opens a GitHub repository as a zip snapshot of its default branch and
//! reports top-level functions and classes that nothing else references.
//!
//! The engine is deliberately shallow: a candidate is dead when its name
//! never appears anywhere in the analyzed files except at its own
//! definition. Exported definitions are never reported.
//!
//! ```rust,no_run
//! use gh_client::OctocrabClient;
//! use gh_dead_code_engine::{AnalysisOptions, AnalyzerSettings, GitHubAnalyzer, RepositoryAnalyzer};
//!
//! # async fn example(client: OctocrabClient) -> Result<(), gh_dead_code_engine::EngineError> {
//! let analyzer = GitHubAnalyzer::new(client, AnalyzerSettings::default());
//! let snapshot = analyzer.open("acme", "widgets", &AnalysisOptions::default()).await?;
//! for symbol in analyzer.find_dead_symbols(&snapshot)? {
//!     println!("{} {} in {}", symbol.kind, symbol.name, symbol.file_path);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod archive;
pub mod detector;
pub mod error;
pub mod filter;
pub mod language;
pub mod symbols;
pub mod types;

pub use analyzer::{AnalyzerSettings, GitHubAnalyzer, RepositoryAnalyzer};
pub use error::EngineError;
pub use filter::FileFilter;
pub use language::{LanguageFamily, SourceLanguage};
pub use types::{AnalysisOptions, RepositorySnapshot, SourceFile, SymbolKind, SymbolRecord};

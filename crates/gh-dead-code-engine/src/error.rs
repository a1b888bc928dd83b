use gh_client::HostError;
use thiserror::Error;

/// Errors raised by the analysis engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// The repository could not be fetched at all
    #[error("repository {repository} could not be accessed: {source}")]
    Unavailable {
        repository: String,
        #[source]
        source: HostError,
    },

    #[error("failed to read repository archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to read repository archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {path}: {message}")]
    Parser { path: String, message: String },

    #[error("analysis engine failure: {0}")]
    Internal(String),
}

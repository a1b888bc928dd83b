//! Host error classification
//!
//! GitHub failures are folded into a handful of kinds so callers can tell
//! "repository not there" apart from "not allowed" and "API broke".

use thiserror::Error;

/// Errors returned by [`crate::VersionControlHost`] and
/// [`crate::RepositoryArchiveSource`] implementations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl HostError {
    /// Classify an HTTP status code returned by GitHub
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => HostError::NotFound(message),
            401 | 403 => HostError::Unauthorized(message),
            _ => HostError::Api { status, message },
        }
    }
}

impl From<octocrab::Error> for HostError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => {
                HostError::from_status(source.status_code.as_u16(), source.message)
            }
            octocrab::Error::Serde { source, .. } => HostError::InvalidResponse(source.to_string()),
            other => HostError::Transport(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for HostError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => HostError::from_status(status.as_u16(), err.to_string()),
            None => HostError::Transport(err.to_string()),
        }
    }
}

//! Service failures and their HTTP translation
//!
//! Components raise [`ServiceError`]; the endpoint layer is the only place
//! that turns one into a status code and a `{detail}` body.

use crate::schema::ErrorBody;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gh_client::HostError;
use log::{error, warn};
use thiserror::Error;

/// Why a repository could not be opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableCause {
    NotFound,
    Unauthorized,
    Unreachable,
}

impl From<&HostError> for UnavailableCause {
    fn from(err: &HostError) -> Self {
        match err {
            HostError::NotFound(_) => UnavailableCause::NotFound,
            HostError::Unauthorized(_) => UnavailableCause::Unauthorized,
            _ => UnavailableCause::Unreachable,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Malformed or missing repository reference, or a bad request body
    #[error("{0}")]
    Validation(String),

    #[error("Repository {repository} could not be accessed: {reason}")]
    RepositoryUnavailable {
        repository: String,
        reason: String,
        cause: UnavailableCause,
    },

    #[error("Analysis engine error: {0}")]
    AnalysisEngine(String),

    #[error("Failed to create branch {branch}: {reason}")]
    BranchCreation { branch: String, reason: String },

    #[error("Failed to commit changes to branch {branch}: {reason}")]
    Commit { branch: String, reason: String },

    #[error("Failed to open pull request from branch {branch}: {reason}")]
    PullRequestCreation { branch: String, reason: String },
}

impl ServiceError {
    /// Repository could not be opened because of `err`
    pub fn unavailable(repository: impl Into<String>, err: &HostError) -> Self {
        ServiceError::RepositoryUnavailable {
            repository: repository.into(),
            reason: err.to_string(),
            cause: err.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::RepositoryUnavailable { cause, .. } => match cause {
                UnavailableCause::Unauthorized => StatusCode::UNAUTHORIZED,
                UnavailableCause::NotFound | UnavailableCause::Unreachable => {
                    StatusCode::NOT_FOUND
                }
            },
            ServiceError::AnalysisEngine(_)
            | ServiceError::BranchCreation { .. }
            | ServiceError::Commit { .. }
            | ServiceError::PullRequestCreation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();

        if status.is_server_error() {
            error!("{} {}", status.as_u16(), detail);
        } else {
            warn!("{} {}", status.as_u16(), detail);
        }

        (status, Json(ErrorBody { detail })).into_response()
    }
}

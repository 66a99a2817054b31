//! Shared error types for the services crate.

use thiserror::Error;

use assess_core::model::{AssessmentId, DraftError, QuestionId};
use storage::repository::StorageError;

use crate::session::Route;

/// Errors emitted by an `AssessmentApi` implementation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("request failed with status {status}")]
    Status {
        status: reqwest::StatusCode,
        message: Option<String>,
    },
    #[error("malformed response: {0}")]
    InvalidPayload(#[from] assess_core::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// Human readable message supplied by the server, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Validation(message) => Some(message),
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Errors emitted by the assessment session controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("could not load assessment {assessment_id}")]
    FetchFailure {
        assessment_id: AssessmentId,
        #[source]
        source: ApiError,
    },
    #[error("answer at least one question before submitting")]
    ValidationFailure,
    #[error("submission failed: {message}")]
    SubmissionFailure {
        message: String,
        #[source]
        source: ApiError,
    },
    #[error("session has not started")]
    NotStarted,
    #[error("session already submitted")]
    AlreadySubmitted,
    #[error("time is up; answers can no longer change")]
    TimeExpired,
    #[error("question {0} is not part of this assessment")]
    UnknownQuestion(QuestionId),
}

impl SessionError {
    /// Where the taker should be sent after this error, if it ends the session.
    #[must_use]
    pub fn redirect(&self) -> Option<Route> {
        match self {
            SessionError::FetchFailure { .. } => Some(Route::AssessmentList),
            _ => None,
        }
    }
}

/// Errors emitted by the draft authoring service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DraftServiceError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

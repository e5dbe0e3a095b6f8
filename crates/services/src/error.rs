//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use study_core::model::IdError;

/// Errors emitted by `StudyBackend` implementations.
///
/// The `Display` text is what screens show the user.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("server responded {status}: {message}")]
    HttpStatus {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("{0}")]
    Backend(String),
    #[error("unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("could not reach the server: {0}")]
    Http(#[from] reqwest::Error),
}

impl GatewayError {
    /// Whether the failure happened before any response arrived.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Http(_))
    }
}

/// Errors emitted by `StudyService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudyServiceError {
    #[error("pick a PDF file first")]
    NoFileSelected,
    #[error("{0} is not a PDF file")]
    NotPdf(PathBuf),
    #[error("nothing to send: the text is empty")]
    EmptyText,
    #[error("could not read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("this material was not saved, so quiz results cannot be tracked")]
    Untracked,
    #[error("the quiz has no questions")]
    EmptyQuiz,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid API base url {raw:?}: {source}")]
    InvalidBaseUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("API base url must use http or https: {0}")]
    UnsupportedScheme(String),
    #[error(transparent)]
    InvalidUserId(#[from] IdError),
    #[error("invalid upload timeout {0:?}")]
    InvalidTimeout(String),
}

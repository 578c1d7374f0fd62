//! client error taxonomy.

use thiserror::Error;

/// errors returned by every client call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// connection or body-read failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// the api answered with a non-success status.
    #[error("{method} {path} failed with status {status}: {body}")]
    Status {
        method: String,
        path: String,
        status: u16,
        body: String,
    },
    /// response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// graphql envelope carried errors.
    #[error("graphql errors: {}", .messages.join("; "))]
    GraphQl { messages: Vec<String> },
    /// local check failed before any request was sent.
    #[error("precondition failed: {0}")]
    Precondition(String),
    /// invalid client configuration (header names, token values).
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// http status when the api rejected the call.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// true for a 404 from the api.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        ApiError::Precondition(message.into())
    }
}

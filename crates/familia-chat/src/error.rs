//! Chat error types.

use thiserror::Error;

/// Errors that can occur when talking to a chat backend.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The endpoint answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body was not the expected JSON.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

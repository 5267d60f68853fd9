//! Directory API error types

use reqwest::StatusCode;
use thiserror::Error;

/// Errors from the remote directory service, classified by HTTP status so
/// callers can react without inspecting transport types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body rejected by the remote service (HTTP 400).
    #[error("request rejected by the directory service")]
    ValidationRejected,

    /// HTTP 401; on an authenticated call this invalidates the session.
    #[error("unauthorized")]
    Unauthorized,

    /// HTTP 404.
    #[error("record not found")]
    NotFound,

    /// HTTP 5xx.
    #[error("directory service fault (status {0})")]
    ServerFault(u16),

    /// Any other non-success status.
    #[error("unexpected status {0} from the directory service")]
    UnexpectedStatus(u16),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub(crate) fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => ApiError::ValidationRejected,
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound,
            code if status.is_server_error() => ApiError::ServerFault(code),
            code => ApiError::UnexpectedStatus(code),
        }
    }

    /// True for the 401 responses that must tear down the session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

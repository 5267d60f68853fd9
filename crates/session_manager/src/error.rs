//! Session error types
//!
//! The `Display` renderings double as the user-facing messages shown by the
//! console, so view code can surface an error without its own mapping table.

use directory_client::ApiError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Invalid credentials. Please check your username and password.")]
    InvalidCredentials,

    #[error("Authentication failed. Please try again.")]
    AuthenticationFailed,

    #[error("Server error. Please try again later.")]
    ServerFault,

    #[error("An unexpected error occurred. Please try again.")]
    Unexpected,

    /// The session was invalidated, either by a failed refresh or a 401 on
    /// an authenticated call. Logout has already happened when this is
    /// returned.
    #[error("Session expired. Please login again.")]
    SessionExpired,

    #[error("No refresh token available")]
    NoRefreshToken,

    #[error("No current user")]
    NoCurrentUser,

    #[error("No authenticated user")]
    NotAuthenticated,

    #[error("Failed to fetch user profile")]
    ProfileFetchFailed,

    #[error("Failed to update profile")]
    ProfileUpdateFailed,

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;

impl SessionError {
    /// Classification for login/register exchanges, where a 401 means bad
    /// credentials rather than an expired session.
    pub(crate) fn from_auth_exchange(error: &ApiError) -> Self {
        match error {
            ApiError::ValidationRejected => SessionError::InvalidCredentials,
            ApiError::Unauthorized => SessionError::AuthenticationFailed,
            ApiError::ServerFault(_) => SessionError::ServerFault,
            _ => SessionError::Unexpected,
        }
    }
}

//! Observable session-state snapshot

use crate::models::AuthUser;
use serde::{Deserialize, Serialize};

/// Complete, self-consistent snapshot of the authentication state as seen
/// by view components.
///
/// Invariant: `is_authenticated` is true exactly when `user` is present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<AuthUser>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    /// The state of a signed-out process: `{null, false, false, null}`.
    pub fn anonymous() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: false,
            error: None,
        }
    }

    /// A settled authenticated state with no pending work and no error.
    pub fn authenticated(user: AuthUser) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
            is_loading: false,
            error: None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::anonymous()
    }
}

//! # Session Manager
//!
//! Owns the one authoritative, observable authentication state of the
//! user-directory console: login/register/logout/token-refresh exchanges,
//! persistence of the session across restarts, and periodic silent token
//! renewal. View components subscribe to the state stream and invoke the
//! operations; the HTTP transport, key-value persistence, and navigation
//! collaborators are injected at construction.

pub mod error;
pub mod manager;
pub mod navigation;
pub mod storage;

// Re-exports
pub use error::SessionError;
pub use manager::SessionManager;
pub use navigation::{Navigator, NoopNavigator};
pub use storage::{
    FileKeyValueStorage, KeyValueStorage, MemoryStorage, SessionStore, REFRESH_TOKEN_KEY,
    SESSION_KEY,
};

pub use auth_core::{AuthUser, SessionState};

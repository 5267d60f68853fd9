//! # Auth Core
//!
//! Shared data model for the user-directory console backend: wire types for
//! the remote directory API, the authenticated session record, and the
//! observable session-state snapshot.

pub mod config;
pub mod models;
pub mod state;

// Re-exports
pub use config::Config;
pub use models::{
    AuthUser, LoginRequest, LoginResponse, ProfilePatch, RefreshTokenRequest,
    RefreshTokenResponse, RegisterRequest, UserRecord, UsersPage,
};
pub use state::SessionState;

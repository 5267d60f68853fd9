//! # Directory Client
//!
//! HTTP client for the remote user-directory service: credential and
//! token-refresh exchanges plus the user CRUD/search surface. The auth
//! operations are exposed behind the [`AuthApi`] trait so the session layer
//! can be tested against a double.

pub mod auth_api;
pub mod client;
pub mod directory;
pub mod error;

// Re-exports
pub use auth_api::AuthApi;
pub use client::DirectoryClient;
pub use directory::SortOrder;
pub use error::{ApiError, Result};

use async_trait::async_trait;
use auth_core::{
    LoginRequest, LoginResponse, ProfilePatch, RefreshTokenRequest, RefreshTokenResponse,
    RegisterRequest, UserRecord,
};

use crate::error::Result;

/// Transport seam the session layer depends on. Implemented by
/// [`DirectoryClient`](crate::DirectoryClient) against the real service and
/// by fakes in tests.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for an authenticated profile with a token pair.
    /// `POST /auth/login`.
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse>;

    /// Create a directory record for a new user. `POST /users/add`.
    async fn register(&self, request: RegisterRequest) -> Result<UserRecord>;

    /// Exchange a refresh token for a new token pair. `POST /auth/refresh`.
    async fn refresh(&self, request: RefreshTokenRequest) -> Result<RefreshTokenResponse>;

    /// Fetch the profile owning the bearer token. `GET /auth/me`.
    async fn current_user(&self, access_token: &str) -> Result<UserRecord>;

    /// Update a user record as the authenticated user. `PUT /users/{id}`.
    async fn update_user(
        &self,
        id: u64,
        patch: &ProfilePatch,
        access_token: &str,
    ) -> Result<UserRecord>;
}

//! Wire types for the remote user-directory API
//!
//! All bodies use camelCase field names on the wire, matching the remote
//! service.

use serde::{Deserialize, Serialize};

/// Credential exchange request body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,

    /// Requested access-token lifetime. The service default applies when
    /// absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_mins: Option<u64>,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            expires_in_mins: None,
        }
    }
}

/// Success body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub image: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_mins: Option<u64>,
}

/// Success body of `POST /auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Request body for `POST /users/add` when creating an account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// The authenticated identity plus its access/refresh token pair.
///
/// At most one of these is "current" at a time; absence means anonymous.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub image: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl From<LoginResponse> for AuthUser {
    fn from(response: LoginResponse) -> Self {
        Self {
            id: response.id,
            username: response.username,
            email: response.email,
            first_name: response.first_name,
            last_name: response.last_name,
            gender: response.gender,
            image: response.image,
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        }
    }
}

impl AuthUser {
    /// Merge a renewed token pair into the session, leaving profile fields
    /// untouched.
    pub fn with_tokens(mut self, access_token: String, refresh_token: String) -> Self {
        self.access_token = access_token;
        self.refresh_token = refresh_token;
        self
    }

    /// Merge updated profile fields from a directory record back into the
    /// session. Token fields are untouched; a missing image keeps the
    /// current one.
    pub fn merge_profile(&mut self, record: &UserRecord) {
        self.first_name = record.first_name.clone();
        self.last_name = record.last_name.clone();
        self.email = record.email.clone();
        if let Some(image) = &record.image {
            self.image = image.clone();
        }
    }
}

/// Profile record as stored in the remote user directory.
///
/// The remote service returns many more fields than the console uses;
/// unknown fields are ignored and optional ones tolerate absence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maiden_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Partial profile update body for `PUT /users/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Paginated directory listing returned by `GET /users`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsersPage {
    pub users: Vec<UserRecord>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

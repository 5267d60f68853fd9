//! User CRUD and search surface of the directory service
//!
//! These calls back the list/detail screens of the console; unlike the
//! [`AuthApi`](crate::AuthApi) operations they carry no bearer credential.

use auth_core::{ProfilePatch, RegisterRequest, UserRecord, UsersPage};
use serde::Deserialize;

use crate::client::DirectoryClient;
use crate::error::Result;

/// Sort direction for [`DirectoryClient::sort_users`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteUserResponse {
    #[serde(default)]
    is_deleted: bool,
}

impl DirectoryClient {
    /// Fetch the full directory listing. `GET /users`.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let page: UsersPage = self.get_json("/users").await?;
        Ok(page.users)
    }

    /// Fetch one page of the directory. `GET /users?limit=&skip=`.
    pub async fn list_users_page(&self, limit: u64, skip: u64) -> Result<UsersPage> {
        Self::execute(self.get_with_query("/users", &[("limit", limit), ("skip", skip)])).await
    }

    /// Fetch a single record. `GET /users/{id}`.
    pub async fn get_user(&self, id: u64) -> Result<UserRecord> {
        self.get_json(&format!("/users/{id}")).await
    }

    /// Create a record. `POST /users/add`.
    pub async fn create_user(&self, user: &RegisterRequest) -> Result<UserRecord> {
        self.post_json("/users/add", user).await
    }

    /// Update a record without acting as that user. `PUT /users/{id}`.
    pub async fn update_user_record(&self, id: u64, patch: &ProfilePatch) -> Result<UserRecord> {
        Self::execute(self.client().put(self.url(&format!("/users/{id}"))).json(patch)).await
    }

    /// Delete a record, returning the service's deletion flag.
    /// `DELETE /users/{id}`.
    pub async fn delete_user(&self, id: u64) -> Result<bool> {
        let response: DeleteUserResponse =
            Self::execute(self.client().delete(self.url(&format!("/users/{id}")))).await?;
        Ok(response.is_deleted)
    }

    /// Full-text search over the directory. `GET /users/search?q=`.
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserRecord>> {
        let page: UsersPage =
            Self::execute(self.get_with_query("/users/search", &[("q", query)])).await?;
        Ok(page.users)
    }

    /// Exact-match filter on one field. `GET /users/filter?key=&value=`.
    pub async fn filter_users(&self, key: &str, value: &str) -> Result<Vec<UserRecord>> {
        let page: UsersPage =
            Self::execute(self.get_with_query("/users/filter", &[("key", key), ("value", value)]))
                .await?;
        Ok(page.users)
    }

    /// Sorted listing. `GET /users?sortBy=&order=`.
    pub async fn sort_users(&self, sort_by: &str, order: SortOrder) -> Result<Vec<UserRecord>> {
        let page: UsersPage = Self::execute(
            self.get_with_query("/users", &[("sortBy", sort_by), ("order", order.as_str())]),
        )
        .await?;
        Ok(page.users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_order_wire_values() {
        assert_eq!(SortOrder::Asc.as_str(), "asc");
        assert_eq!(SortOrder::Desc.as_str(), "desc");
    }

    #[test]
    fn delete_response_defaults_to_not_deleted() {
        let response: DeleteUserResponse = serde_json::from_str("{}").unwrap();
        assert!(!response.is_deleted);

        let response: DeleteUserResponse =
            serde_json::from_str(r#"{"isDeleted": true}"#).unwrap();
        assert!(response.is_deleted);
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use auth_core::{
    Config, LoginRequest, LoginResponse, ProfilePatch, RefreshTokenRequest, RefreshTokenResponse,
    RegisterRequest, UserRecord,
};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth_api::AuthApi;
use crate::error::{ApiError, Result};

/// HTTP client for the user-directory service.
///
/// Cheap to clone; the underlying connection pool and retry middleware are
/// shared.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: Arc<ClientWithMiddleware>,
    base_url: String,
}

impl DirectoryClient {
    pub fn new(config: &Config) -> Self {
        let client = Self::build_http_client();
        let retry_client = Self::build_retry_client(client);
        DirectoryClient {
            client: Arc::new(retry_client),
            base_url: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    fn build_http_client() -> Client {
        Client::builder()
            .default_headers(Self::default_headers())
            .build()
            .expect("directory client")
    }

    fn build_retry_client(client: Client) -> ClientWithMiddleware {
        // Transient failures (5xx, connection resets) are retried with
        // exponential backoff; 4xx responses are not.
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);

        ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!("directory request failed with status {status}");
            return Err(ApiError::from_status(status));
        }
        Ok(response.json::<T>().await?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        Self::execute(self.client.get(self.url(path))).await
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        Self::execute(self.client.post(self.url(path)).json(body)).await
    }

    pub(crate) fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> RequestBuilder {
        self.client.get(self.url(path)).query(query)
    }

    pub(crate) fn client(&self) -> &ClientWithMiddleware {
        &self.client
    }
}

#[async_trait]
impl AuthApi for DirectoryClient {
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        debug!("credential exchange for user {}", request.username);
        self.post_json("/auth/login", &request).await
    }

    async fn register(&self, request: RegisterRequest) -> Result<UserRecord> {
        self.post_json("/users/add", &request).await
    }

    async fn refresh(&self, request: RefreshTokenRequest) -> Result<RefreshTokenResponse> {
        self.post_json("/auth/refresh", &request).await
    }

    async fn current_user(&self, access_token: &str) -> Result<UserRecord> {
        Self::execute(self.client.get(self.url("/auth/me")).bearer_auth(access_token)).await
    }

    async fn update_user(
        &self,
        id: u64,
        patch: &ProfilePatch,
        access_token: &str,
    ) -> Result<UserRecord> {
        Self::execute(
            self.client
                .put(self.url(&format!("/users/{id}")))
                .bearer_auth(access_token)
                .json(patch),
        )
        .await
    }
}

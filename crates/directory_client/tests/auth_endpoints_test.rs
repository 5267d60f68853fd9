use auth_core::{Config, LoginRequest, ProfilePatch, RefreshTokenRequest, RegisterRequest};
use directory_client::{ApiError, AuthApi, DirectoryClient};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> DirectoryClient {
    DirectoryClient::new(&Config {
        api_base: server.uri(),
        token_ttl_mins: 30,
    })
}

fn login_body() -> serde_json::Value {
    serde_json::json!({
        "id": 1,
        "username": "emilys",
        "email": "emily.johnson@x.dummyjson.com",
        "firstName": "Emily",
        "lastName": "Johnson",
        "gender": "female",
        "image": "https://dummyjson.com/icon/emilys/128",
        "accessToken": "AT1",
        "refreshToken": "RT1"
    })
}

#[tokio::test]
async fn login_sends_credentials_and_maps_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({
            "username": "emilys",
            "password": "emilyspass",
            "expiresInMins": 30
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = LoginRequest {
        username: "emilys".to_string(),
        password: "emilyspass".to_string(),
        expires_in_mins: Some(30),
    };

    let response = client.login(request).await.expect("login");
    assert_eq!(response.id, 1);
    assert_eq!(response.access_token, "AT1");
    assert_eq!(response.refresh_token, "RT1");
}

#[tokio::test]
async fn login_rejection_classifies_as_validation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"message": "Invalid credentials"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.login(LoginRequest::new("emilys", "wrong")).await;

    assert!(matches!(result, Err(ApiError::ValidationRejected)));
}

#[tokio::test]
async fn refresh_exchanges_token_pair() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(serde_json::json!({
            "refreshToken": "RT1",
            "expiresInMins": 30
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "accessToken": "AT2",
            "refreshToken": "RT2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .refresh(RefreshTokenRequest {
            refresh_token: "RT1".to_string(),
            expires_in_mins: Some(30),
        })
        .await
        .expect("refresh");

    assert_eq!(response.access_token, "AT2");
    assert_eq!(response.refresh_token, "RT2");
}

#[tokio::test]
async fn current_user_attaches_bearer_credential() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("Authorization", "Bearer AT1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "firstName": "Emily",
            "lastName": "Johnson",
            "email": "emily.johnson@x.dummyjson.com",
            "username": "emilys"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let record = client.current_user("AT1").await.expect("profile");

    assert_eq!(record.id, 1);
    assert_eq!(record.username.as_deref(), Some("emilys"));
}

#[tokio::test]
async fn current_user_rejected_token_is_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.current_user("stale").await;

    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn update_user_puts_patch_with_bearer_credential() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .and(header("Authorization", "Bearer AT1"))
        .and(body_json(serde_json::json!({"firstName": "Emma"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "firstName": "Emma",
            "lastName": "Johnson",
            "email": "emily.johnson@x.dummyjson.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let patch = ProfilePatch {
        first_name: Some("Emma".to_string()),
        ..ProfilePatch::default()
    };

    let record = client.update_user(1, &patch, "AT1").await.expect("update");
    assert_eq!(record.first_name, "Emma");
}

#[tokio::test]
async fn register_creates_directory_record() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/add"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 209,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@x.dummyjson.com",
            "username": "adal"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = RegisterRequest {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        username: "adal".to_string(),
        email: "ada@x.dummyjson.com".to_string(),
        password: "verysecret".to_string(),
        ..RegisterRequest::default()
    };

    let record = client.register(request).await.expect("register");
    assert_eq!(record.id, 209);
}

/// Transient 5xx responses are retried by the middleware; the caller only
/// sees the eventual outcome.
#[tokio::test]
async fn login_retries_transient_server_errors() {
    let server = MockServer::start().await;
    let hits = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = hits.clone();

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(move |_req: &wiremock::Request| {
            let count = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if count < 2 {
                ResponseTemplate::new(503)
            } else {
                ResponseTemplate::new(200).set_body_json(login_body())
            }
        })
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .login(LoginRequest::new("emilys", "emilyspass"))
        .await
        .expect("login after retries");

    assert_eq!(response.access_token, "AT1");
    assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 3);
}

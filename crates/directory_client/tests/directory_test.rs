use auth_core::Config;
use directory_client::{ApiError, DirectoryClient, SortOrder};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> DirectoryClient {
    DirectoryClient::new(&Config {
        api_base: server.uri(),
        token_ttl_mins: 30,
    })
}

fn page_body(names: &[(u64, &str)]) -> serde_json::Value {
    let users: Vec<serde_json::Value> = names
        .iter()
        .map(|(id, name)| {
            serde_json::json!({
                "id": id,
                "firstName": name,
                "lastName": "Example",
                "email": format!("{}@x.dummyjson.com", name.to_lowercase())
            })
        })
        .collect();
    serde_json::json!({
        "users": users,
        "total": names.len(),
        "skip": 0,
        "limit": 30
    })
}

#[tokio::test]
async fn list_users_unwraps_page_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body(&[(1, "Emily"), (2, "Michael")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let users = client_for(&server).list_users().await.expect("list");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].first_name, "Emily");
}

#[tokio::test]
async fn list_users_page_passes_limit_and_skip() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("limit", "10"))
        .and(query_param("skip", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "users": [],
            "total": 208,
            "skip": 20,
            "limit": 10
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .list_users_page(10, 20)
        .await
        .expect("page");
    assert_eq!(page.total, 208);
    assert_eq!(page.skip, 20);
}

#[tokio::test]
async fn get_user_missing_record_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/999"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).get_user(999).await;
    assert!(matches!(result, Err(ApiError::NotFound)));
}

#[tokio::test]
async fn search_users_encodes_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/search"))
        .and(query_param("q", "emily johnson"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[(1, "Emily")])))
        .expect(1)
        .mount(&server)
        .await;

    let users = client_for(&server)
        .search_users("emily johnson")
        .await
        .expect("search");
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn filter_users_passes_key_and_value() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/filter"))
        .and(query_param("key", "role"))
        .and(query_param("value", "admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[(1, "Emily")])))
        .expect(1)
        .mount(&server)
        .await;

    let users = client_for(&server)
        .filter_users("role", "admin")
        .await
        .expect("filter");
    assert_eq!(users[0].id, 1);
}

#[tokio::test]
async fn sort_users_passes_sort_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("sortBy", "lastName"))
        .and(query_param("order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[(2, "Zoe")])))
        .expect(1)
        .mount(&server)
        .await;

    let users = client_for(&server)
        .sort_users("lastName", SortOrder::Desc)
        .await
        .expect("sort");
    assert_eq!(users[0].first_name, "Zoe");
}

#[tokio::test]
async fn delete_user_returns_service_flag() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "firstName": "Emily",
            "lastName": "Johnson",
            "email": "emily.johnson@x.dummyjson.com",
            "isDeleted": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let deleted = client_for(&server).delete_user(1).await.expect("delete");
    assert!(deleted);
}

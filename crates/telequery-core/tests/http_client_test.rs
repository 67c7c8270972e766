//! Integration tests for the provider HTTP client against a mock server.
//!
//! Covers:
//! - Login and query request shapes
//! - HTTP error mapping and undecodable bodies
//! - The full cache/re-login flow over HTTP with a file-backed store

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Map};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use telequery_core::{
    AccountCredential, ApiError, Authenticator, CredentialStore, FileCredentialStore, HttpRemoteClient,
    QueryExecutor, RemoteClient, SessionCacheManager,
};

fn client_for(server: &MockServer) -> HttpRemoteClient {
    HttpRemoteClient::new(server.uri(), Duration::from_secs(5)).expect("client build")
}

fn login_response(token: &str) -> serde_json::Value {
    json!({
        "responseData": {
            "resultCode": "0000",
            "data": { "loginSuccessResult": { "token": token, "userId": "u-1" } }
        }
    })
}

#[tokio::test]
async fn login_posts_credentials_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_partial_json(json!({"phonenum": "1380000", "password": "pw1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_response("t1")))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .login("1380000", "pw1")
        .await
        .expect("login succeeds");

    assert_eq!(response, login_response("t1"));
}

#[tokio::test]
async fn call_sends_session_and_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/qryShareUsage"))
        .and(body_partial_json(json!({
            "loginInfo": {"token": "t1"},
            "billing_cycle": "202410"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"responseData": {"usage": 7}})))
        .expect(1)
        .mount(&server)
        .await;

    let mut params = Map::new();
    params.insert("billing_cycle".to_string(), json!("202410"));
    let response = client_for(&server)
        .call(&json!({"token": "t1"}), "qryShareUsage", params)
        .await
        .expect("call succeeds");

    assert_eq!(response["responseData"]["usage"], 7);
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .login("1380000", "pw1")
        .await
        .expect_err("503 is an error");

    assert!(matches!(err, ApiError::ServerError(ref body) if body == "maintenance"));
}

#[tokio::test]
async fn non_json_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/qryImportantData"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .call(&json!({"token": "t1"}), "qryImportantData", Map::new())
        .await
        .expect_err("html is not json");

    assert!(matches!(err, ApiError::InvalidResponse(_)));
}

#[tokio::test]
async fn unreachable_provider_is_network_error() {
    // Port 9 (discard) on localhost is not expected to accept HTTP
    let client = HttpRemoteClient::new("http://127.0.0.1:9", Duration::from_secs(2)).expect("client build");

    let err = client.login("1380000", "pw1").await.expect_err("no server");
    assert!(matches!(err, ApiError::NetworkError(_)));
}

#[tokio::test]
async fn expired_session_is_renewed_over_http() {
    let server = MockServer::start().await;

    // Stale session gets X201 once
    Mock::given(method("POST"))
        .and(path("/qryImportantData"))
        .and(body_partial_json(json!({"loginInfo": {"token": "stale"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"headerInfos": {"code": "X201"}})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_response("fresh")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/qryImportantData"))
        .and(body_partial_json(json!({"loginInfo": {"token": "fresh"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"responseData": {"balance": "12.30"}})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(FileCredentialStore::new(dir.path().join("config").join("login_info.json")));
    let cred = AccountCredential::new("1380000", "pw1");

    // Seed the store with a session the provider no longer accepts
    let stale = telequery_core::SessionRecord::from_login(&cred, json!({"token": "stale"}))
        .expect("object payload");
    store.upsert("1380000", stale).expect("seed");

    let client = Arc::new(client_for(&server));
    let executor = QueryExecutor::new(SessionCacheManager::new(Authenticator::new(client, store.clone())));

    let payload = executor.important_data(&cred).await.expect("renewed query succeeds");
    assert_eq!(payload["responseData"]["balance"], "12.30");

    let stored = store.get("1380000").expect("get").expect("record");
    assert_eq!(stored.payload["token"], "fresh");
    assert_eq!(stored.payload["userId"], "u-1");
    assert!(stored.is_usable_for(&cred));
}

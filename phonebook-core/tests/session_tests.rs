//! Integration tests for the session store
//!
//! The backend is a wiremock server; storage is the in-memory adapter so
//! tests can look at exactly what was persisted.
//!
//! Run with: cargo test --test session_tests

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use phonebook_core::adapters::{ApiClient, FileStore, MemoryStore};
use phonebook_core::ports::KeyValueStore;
use phonebook_core::services::SessionStore;
use phonebook_core::{AuthState, Error, Result};

// ============================================================================
// Test Helpers
// ============================================================================

fn session_for(server: &MockServer) -> (Arc<MemoryStore>, SessionStore) {
    let storage = Arc::new(MemoryStore::new());
    let api = ApiClient::new(&format!("{}/api", server.uri())).unwrap();
    let session = SessionStore::new(storage.clone(), api);
    (storage, session)
}

/// Memory store whose writes to one key always fail
struct FailingStore {
    inner: MemoryStore,
    failing_key: &'static str,
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if key == self.failing_key {
            return Err(Error::storage(format!("disk full writing {}", key)));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

async fn mount_login(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(response)
        .mount(server)
        .await;
}

// ============================================================================
// Successful login
// ============================================================================

#[tokio::test]
async fn test_login_stores_token_and_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"email": "a@b.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "T1",
            "user": {"email": "a@b.com"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (storage, mut session) = session_for(&server);
    assert!(!session.is_authenticated());

    let payload = session.login("a@b.com", "pw").await.unwrap();
    assert_eq!(payload.token.as_deref(), Some("T1"));

    assert!(session.is_authenticated());
    assert_eq!(session.token(), Some("T1"));
    assert_eq!(session.auth_header(), "Bearer T1");
    assert_eq!(session.auth_state(), AuthState::Authenticated);
    assert_eq!(session.user().unwrap().email, "a@b.com");
    assert_eq!(storage.get("token").unwrap().as_deref(), Some("T1"));
}

#[tokio::test]
async fn test_login_without_user_stores_email_profile() {
    let server = MockServer::start().await;
    mount_login(&server, ResponseTemplate::new(200).set_body_json(json!({"token": "T9"}))).await;

    let (storage, mut session) = session_for(&server);
    session.login("solo@example.com", "pw").await.unwrap();

    let stored: serde_json::Value =
        serde_json::from_str(&storage.get("user").unwrap().unwrap()).unwrap();
    assert_eq!(stored, json!({"email": "solo@example.com"}));
}

#[tokio::test]
async fn test_session_survives_restart() {
    let server = MockServer::start().await;
    mount_login(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "token": "T1",
            "user": {"id": "u1", "email": "a@b.com", "name": "Ada"}
        })),
    )
    .await;

    let dir = tempfile::TempDir::new().unwrap();
    let api = ApiClient::new(&format!("{}/api", server.uri())).unwrap();

    let mut first = SessionStore::new(Arc::new(FileStore::in_dir(dir.path())), api.clone());
    first.login("a@b.com", "pw").await.unwrap();
    drop(first);

    let second = SessionStore::new(Arc::new(FileStore::in_dir(dir.path())), api);
    assert!(second.is_authenticated());
    assert_eq!(second.token(), Some("T1"));
    assert_eq!(second.user().unwrap().name.as_deref(), Some("Ada"));
}

// ============================================================================
// Rejected login
// ============================================================================

#[tokio::test]
async fn test_rejected_login_uses_json_error() {
    let server = MockServer::start().await;
    mount_login(
        &server,
        ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
    )
    .await;

    let (storage, mut session) = session_for(&server);
    let err = session.login("a@b.com", "wrong").await.unwrap_err();

    assert!(matches!(&err, Error::Auth(msg) if msg == "Invalid credentials"));
    assert!(!session.is_authenticated());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_rejected_login_uses_raw_text() {
    let server = MockServer::start().await;
    mount_login(&server, ResponseTemplate::new(502).set_body_string("Bad Gateway")).await;

    let (storage, mut session) = session_for(&server);
    let err = session.login("a@b.com", "pw").await.unwrap_err();

    assert_eq!(err.to_string(), "Bad Gateway");
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_rejected_login_with_empty_body() {
    let server = MockServer::start().await;
    mount_login(&server, ResponseTemplate::new(500)).await;

    let (storage, mut session) = session_for(&server);
    let err = session.login("a@b.com", "pw").await.unwrap_err();

    assert_eq!(err.to_string(), "Login failed");
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_rejected_login_never_persists_token_even_with_token_in_body() {
    let server = MockServer::start().await;
    mount_login(
        &server,
        ResponseTemplate::new(403).set_body_json(json!({"token": "SHOULD-NOT-STICK", "message": "Forbidden"})),
    )
    .await;

    let (storage, mut session) = session_for(&server);
    let err = session.login("a@b.com", "pw").await.unwrap_err();

    assert_eq!(err.to_string(), "Forbidden");
    assert_eq!(storage.get("token").unwrap(), None);
    assert_eq!(session.token(), None);
}

#[tokio::test]
async fn test_missing_token_is_auth_error() {
    let server = MockServer::start().await;
    mount_login(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"user": {"email": "a@b.com"}})),
    )
    .await;

    let (storage, mut session) = session_for(&server);
    let err = session.login("a@b.com", "pw").await.unwrap_err();

    assert!(matches!(&err, Error::Auth(msg) if msg == "No token received"));
    assert!(storage.is_empty());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_malformed_success_body_is_auth_error() {
    let server = MockServer::start().await;
    mount_login(&server, ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;

    let (storage, mut session) = session_for(&server);
    let err = session.login("a@b.com", "pw").await.unwrap_err();

    assert!(matches!(err, Error::Auth(_)));
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Reserve a port, then free it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let api = ApiClient::new(&format!("http://127.0.0.1:{}/api", port)).unwrap();
    let mut session = SessionStore::new(Arc::new(MemoryStore::new()), api);
    let err = session.login("a@b.com", "pw").await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
}

// ============================================================================
// Storage failures during login
// ============================================================================

async fn login_with_failing_key(failing_key: &'static str) -> (Arc<FailingStore>, ApiClient) {
    let server = MockServer::start().await;
    mount_login(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"token": "T1", "user": {"email": "a@b.com"}})),
    )
    .await;

    let storage = Arc::new(FailingStore {
        inner: MemoryStore::new(),
        failing_key,
    });
    let api = ApiClient::new(&format!("{}/api", server.uri())).unwrap();
    let mut session = SessionStore::new(storage.clone(), api.clone());

    let err = session.login("a@b.com", "pw").await.unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
    assert!(!session.is_authenticated());
    (storage, api)
}

#[tokio::test]
async fn test_failed_profile_write_persists_no_token() {
    let (storage, api) = login_with_failing_key("user").await;

    assert_eq!(storage.get("token").unwrap(), None);
    assert!(storage.inner.is_empty());
    let restarted = SessionStore::new(storage, api);
    assert!(!restarted.is_authenticated());
}

#[tokio::test]
async fn test_failed_token_write_clears_profile() {
    let (storage, api) = login_with_failing_key("token").await;

    assert_eq!(storage.get("user").unwrap(), None);
    assert!(storage.inner.is_empty());
    let restarted = SessionStore::new(storage, api);
    assert!(!restarted.is_authenticated());
    assert!(restarted.user().is_none());
}

// ============================================================================
// Login / logout sequences
// ============================================================================

#[tokio::test]
async fn test_authenticated_only_between_login_and_logout() {
    let server = MockServer::start().await;
    mount_login(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"token": "T1", "user": {"email": "a@b.com"}})),
    )
    .await;

    let (storage, mut session) = session_for(&server);

    for _ in 0..3 {
        assert!(!session.is_authenticated());
        session.login("a@b.com", "pw").await.unwrap();
        assert!(session.is_authenticated());
        session.logout();
        assert!(!session.is_authenticated());
        assert!(storage.is_empty());
        assert!(session.user().is_none());
    }
}

#[tokio::test]
async fn test_auth_header_tracks_latest_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "first@b.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "FIRST"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "second@b.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "SECOND"})))
        .mount(&server)
        .await;

    let (_, mut session) = session_for(&server);
    assert_eq!(session.auth_header(), "Bearer ");

    session.login("first@b.com", "pw").await.unwrap();
    assert_eq!(session.auth_header(), "Bearer FIRST");
    assert_eq!(session.auth_header(), "Bearer FIRST");

    session.login("second@b.com", "pw").await.unwrap();
    assert_eq!(session.auth_header(), "Bearer SECOND");

    session.logout();
    assert_eq!(session.auth_header(), "Bearer ");
}

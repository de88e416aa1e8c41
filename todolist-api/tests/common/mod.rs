/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - An application wired to an in-memory credential store
/// - Signup/login helpers that return the session cookie
/// - Request and response helpers

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use todolist_api::app::{build_router, AppState};
use todolist_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, TodoConfig};
use todolist_shared::store::{CredentialStore, MemoryStore};
use tower::Service as _;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing the router and its backing store
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
}

impl TestContext {
    /// Creates a context with default settings
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Creates a context with a custom configuration
    pub fn with_config(config: Config) -> Self {
        Self::build(config, |store| store as Arc<dyn CredentialStore>)
    }

    /// Creates a context whose router sees `wrap(store)` instead of the
    /// bare memory store
    pub fn with_store_wrapper<F>(wrap: F) -> Self
    where
        F: FnOnce(Arc<MemoryStore>) -> Arc<dyn CredentialStore>,
    {
        Self::build(test_config(), wrap)
    }

    fn build<F>(config: Config, wrap: F) -> Self
    where
        F: FnOnce(Arc<MemoryStore>) -> Arc<dyn CredentialStore>,
    {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(wrap(store.clone()), config);
        let app = build_router(state);

        Self { store, app }
    }

    /// Sends a request and returns the raw response
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.app.clone().call(request).await.unwrap()
    }

    /// Sends a request and returns status plus parsed JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.request(method, uri, cookie, body).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    /// Sends a JSON-typed request with an arbitrary (possibly invalid) body
    pub async fn send_raw(&self, method: Method, uri: &str, raw: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw.to_string()))
            .unwrap();

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    /// Registers a user, panicking on failure
    pub async fn signup(&self, username: &str, password: &str) {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/signup",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "signup failed: {}", body);
    }

    /// Logs in and returns a `Cookie` header value carrying the session
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/auth/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK, "login failed");

        let set_cookie = set_cookie_header(&response);
        set_cookie
            .split(';')
            .next()
            .map(str::to_string)
            .unwrap()
    }

    /// Signs up and logs in, returning the session cookie
    pub async fn register(&self, username: &str, password: &str) -> String {
        self.signup(username, password).await;
        self.login(username, password).await
    }

    /// Creates a todo and returns its ID (read back from the list)
    pub async fn create_todo(&self, cookie: &str, name: &str) -> String {
        let (status, _) = self
            .send(
                Method::POST,
                "/todo",
                Some(cookie),
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, list) = self.send(Method::GET, "/todo", Some(cookie), None).await;
        list["data"]
            .as_array()
            .unwrap()
            .iter()
            .rev()
            .find(|todo| todo["name"] == name)
            .map(|todo| todo["id"].as_str().unwrap().to_string())
            .unwrap()
    }
}

/// Default configuration for tests
pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
        todos: TodoConfig::default(),
    }
}

/// Returns the `Set-Cookie` header as a string
pub fn set_cookie_header(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("missing Set-Cookie header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Reads the body as JSON (`Value::Null` for an empty body)
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

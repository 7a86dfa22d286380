//! Integration tests for Shopdesk.
//!
//! The admin router runs in process over the in-memory store and an
//! in-memory session store, so no database or server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopdesk-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use shopdesk_admin::{
    config::AdminConfig, db::MemoryStore, services::AdminAuthService, state::AppState,
};

/// Email of the admin every test app starts with.
pub const ADMIN_EMAIL: &str = "ops@example.com";
/// Password of that admin.
pub const ADMIN_PASSWORD: &str = "correct horse battery";

/// The admin router plus the store behind it and the current session cookie.
pub struct TestApp {
    router: Router,
    store: MemoryStore,
    cookie: Option<String>,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text)
            .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", self.text))
    }
}

impl TestApp {
    /// App with the default in-memory configuration and one admin account.
    pub async fn new() -> Self {
        Self::with_config(AdminConfig::in_memory()).await
    }

    /// App with a custom configuration and one admin account.
    pub async fn with_config(config: AdminConfig) -> Self {
        let store = MemoryStore::new();
        AdminAuthService::new(&store)
            .create_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .expect("create test admin");

        let state = AppState::new(config, Arc::new(store.clone()));
        let router = shopdesk_admin::app(state, tower_sessions::MemoryStore::default());

        Self {
            router,
            store,
            cookie: None,
        }
    }

    /// Serve the router on an ephemeral local port and return its base URL.
    ///
    /// The server runs on a background task for the rest of the test.
    pub async fn serve(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve test app");
        });
        format!("http://{addr}")
    }

    /// The store behind the router.
    pub const fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Send a request with the current session cookie, if any.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");

        TestResponse {
            status,
            headers,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    /// Log in as the test admin and keep the session cookie.
    pub async fn login(&mut self) {
        let response = self
            .post(
                "/api/auth/login",
                serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text);

        let cookie = response
            .headers
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .expect("login sets the session cookie");
        self.cookie = Some(cookie.to_owned());
    }

    /// Create a product through the API and return its id.
    pub async fn create_product(&self, name: &str, price: &str, stock: i32, category: &str) -> i64 {
        let response = self
            .post(
                "/api/products",
                serde_json::json!({
                    "name": name,
                    "description": format!("{name} description"),
                    "price": price,
                    "stock": stock,
                    "category": category,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.json()["data"]["id"]
            .as_i64()
            .expect("product id")
    }

    /// Place an order for one product and return the created order.
    pub async fn place_order(&self, name: &str, email: &str, product: i64, quantity: i32) -> Value {
        let response = self
            .post(
                "/api/orders",
                serde_json::json!({
                    "customerName": name,
                    "customerEmail": email,
                    "items": [{ "product": product, "quantity": quantity }],
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.json()["data"].clone()
    }
}

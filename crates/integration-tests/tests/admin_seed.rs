//! The shared-secret seed endpoint.

use axum::http::StatusCode;
use secrecy::SecretString;
use serde_json::json;

use shopdesk_admin::config::AdminConfig;
use shopdesk_integration_tests::TestApp;

const SECRET: &str = "kX9mQ2vL7pR4wZ8t";

async fn app_with_secret() -> TestApp {
    let mut config = AdminConfig::in_memory();
    config.seed.secret = Some(SecretString::from(SECRET));
    TestApp::with_config(config).await
}

#[tokio::test]
async fn test_seed_twice_creates_nothing_the_second_time() {
    let app = app_with_secret().await;

    let first = app.get(&format!("/api/seed?secret={SECRET}")).await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.text);
    // The test app already has an admin.
    assert_eq!(
        first.json()["data"],
        json!({ "adminsCreated": 0, "productsCreated": 7, "ordersCreated": 3 })
    );

    let second = app.get(&format!("/api/seed?secret={SECRET}")).await;
    assert_eq!(
        second.json()["data"],
        json!({ "adminsCreated": 0, "productsCreated": 0, "ordersCreated": 0 })
    );

    let products = app.get("/api/products?limit=100").await.json();
    assert_eq!(products["pagination"]["total"], 7);
    let orders = app.get("/api/orders").await.json();
    assert_eq!(orders["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_seed_requires_the_secret() {
    let app = app_with_secret().await;
    assert_eq!(app.get("/api/seed").await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        app.get("/api/seed?secret=wrong").await.status,
        StatusCode::UNAUTHORIZED
    );

    let unconfigured = TestApp::new().await;
    assert_eq!(
        unconfigured
            .get(&format!("/api/seed?secret={SECRET}"))
            .await
            .status,
        StatusCode::UNAUTHORIZED
    );
}

//! Product listing and catalog management through the admin router.

use axum::http::{Method, StatusCode};
use serde_json::json;

use shopdesk_integration_tests::TestApp;

#[tokio::test]
async fn test_created_product_is_found_by_name_prefix() {
    let mut app = TestApp::new().await;
    app.login().await;
    app.create_product("Widget", "9.99", 5, "Tools").await;
    app.create_product("Gadget", "19.99", 2, "Tools").await;

    let response = app.get("/api/products?query=Widg&page=1&limit=10").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Widget");
    assert_eq!(body["data"][0]["price"], "9.99");
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["totalPages"], 1);
}

#[tokio::test]
async fn test_pages_cover_every_product_once() {
    let mut app = TestApp::new().await;
    app.login().await;
    for i in 0..7 {
        app.create_product(&format!("Lamp {i}"), "12.00", 1, "Lighting")
            .await;
    }

    let mut seen = Vec::new();
    for page in 1..=3 {
        let body = app
            .get(&format!("/api/products?page={page}&limit=3&query=lamp"))
            .await
            .json();
        assert_eq!(body["pagination"]["totalPages"], 3);
        let rows = body["data"].as_array().unwrap();
        assert!(rows.len() <= 3);
        seen.extend(rows.iter().map(|p| p["name"].as_str().unwrap().to_owned()));
    }

    // Newest first.
    assert_eq!(seen.first().map(String::as_str), Some("Lamp 6"));
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 7);

    let beyond = app.get("/api/products?page=9&limit=3").await.json();
    assert_eq!(beyond["data"], json!([]));
    assert_eq!(beyond["pagination"]["total"], 7);
}

#[tokio::test]
async fn test_invalid_paging_is_rejected() {
    let app = TestApp::new().await;

    let response = app.get("/api/products?page=0").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["success"], false);

    let response = app.get("/api/products?limit=0").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mutations_require_login() {
    let app = TestApp::new().await;

    let response = app
        .post(
            "/api/products",
            json!({"name": "Widget", "description": "x", "price": "1.00", "category": "Tools"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json(), json!({"success": false, "error": "Unauthorized"}));

    let response = app.request(Method::DELETE, "/api/products/1", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_validation_errors_are_bad_requests() {
    let mut app = TestApp::new().await;
    app.login().await;

    let response = app
        .post(
            "/api/products",
            json!({
                "name": "x".repeat(61),
                "description": "Too long",
                "price": "1.00",
                "category": "Tools",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["error"],
        "Name cannot be more than 60 characters"
    );

    let response = app
        .post(
            "/api/products",
            json!({"name": "Free", "description": "Nope", "price": 0, "category": "Tools"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_prices_must_fit_stored_amounts() {
    let mut app = TestApp::new().await;
    app.login().await;

    for (price, error) in [
        ("1.999", "Price cannot have more than 2 decimal places"),
        ("10000000000", "Price must be less than 10000000000"),
        (
            "79228162514264337593543950335",
            "Price must be less than 10000000000",
        ),
    ] {
        let response = app
            .post(
                "/api/products",
                json!({"name": "Yacht", "description": "Big", "price": price, "category": "Boats"}),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{price}");
        assert_eq!(response.json()["error"], error);
    }

    app.create_product("Yacht", "9999999999.99", 1, "Boats").await;
}

#[tokio::test]
async fn test_search_keeps_surrounding_whitespace() {
    let mut app = TestApp::new().await;
    app.login().await;
    app.create_product("Desk Lamp", "25.00", 3, "Lighting").await;
    app.create_product("Widget", "9.99", 5, "Tools").await;

    let spaced = app.get("/api/products?query=%20lamp").await.json();
    assert_eq!(spaced["pagination"]["total"], 1);
    assert_eq!(spaced["data"][0]["name"], "Desk Lamp");

    let leading = app.get("/api/products?query=%20widg").await.json();
    assert_eq!(leading["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_replace_and_delete() {
    let mut app = TestApp::new().await;
    app.login().await;
    let id = app.create_product("Widget", "9.99", 5, "Tools").await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/products/{id}"),
            Some(json!({
                "name": "Widget Pro",
                "description": "Better",
                "price": "14.50",
                "stock": 3,
                "category": "Tools",
                "images": ["https://cdn.example.com/w.png"],
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text);

    let product = app.get(&format!("/api/products/{id}")).await.json();
    assert_eq!(product["data"]["name"], "Widget Pro");
    assert_eq!(product["data"]["price"], "14.50");
    assert_eq!(product["data"]["images"][0], "https://cdn.example.com/w.png");

    let response = app
        .request(Method::DELETE, &format!("/api/products/{id}"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.get(&format!("/api/products/{id}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "Product not found");

    let response = app
        .request(Method::DELETE, &format!("/api/products/{id}"), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

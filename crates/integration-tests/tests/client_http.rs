//! The HTTP client against the real router over TCP.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use shopdesk_admin::db::ProductStore;
use shopdesk_client::{ApiError, DashboardApi, HttpApi};
use shopdesk_core::{NewLineItem, NewOrder, OrderStatus, ProductInput};
use shopdesk_integration_tests::{ADMIN_EMAIL, ADMIN_PASSWORD, TestApp};

fn product(name: &str, cents: i64, stock: i32) -> ProductInput {
    ProductInput {
        name: name.to_owned(),
        description: format!("{name} description"),
        price: Decimal::new(cents, 2),
        stock,
        category: "Tools".to_owned(),
        images: vec![],
    }
}

fn order_for(product: shopdesk_core::ProductId, quantity: i32, total: Decimal) -> NewOrder {
    NewOrder {
        customer_name: "Bob Smith".to_owned(),
        customer_email: "bob@test.com".to_owned(),
        items: vec![NewLineItem { product, quantity }],
        total: Some(total),
    }
}

#[tokio::test]
async fn test_session_cookie_authorizes_later_calls() {
    let app = TestApp::new().await;
    let api = HttpApi::new(&app.serve().await).unwrap();

    assert!(matches!(api.list_admins().await, Err(ApiError::Unauthorized)));
    assert!(matches!(
        api.login(ADMIN_EMAIL, "wrong password").await,
        Err(ApiError::Unauthorized)
    ));

    api.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
    let admins = api.list_admins().await.unwrap();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].email.as_str(), ADMIN_EMAIL);

    let created = api.create_admin("new@example.com", "hunter22").await.unwrap();
    assert_eq!(created.email.as_str(), "new@example.com");

    api.logout().await.unwrap();
    assert!(matches!(api.list_admins().await, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn test_product_page_carries_pagination() {
    let app = TestApp::new().await;
    for i in 0..7 {
        app.store()
            .create_product(&product(&format!("Lamp {i}"), 1_000, 1))
            .await
            .unwrap();
    }
    app.store()
        .create_product(&product("Widget", 999, 5))
        .await
        .unwrap();
    let api = HttpApi::new(&app.serve().await).unwrap();

    let page = api.list_products(2, 5, "").await.unwrap();
    assert_eq!(page.total, 8);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.products.len(), 3);

    let found = api.list_products(1, 5, "widg").await.unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.products[0].price, Decimal::new(999, 2));

    let err = api.list_products(0, 5, "").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn test_order_workflow_over_the_wire() {
    let app = TestApp::new().await;
    let widget = app
        .store()
        .create_product(&product("Widget", 999, 5))
        .await
        .unwrap();
    let api = HttpApi::new(&app.serve().await).unwrap();
    api.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();

    let placed = api
        .create_order(&order_for(widget.id, 2, Decimal::new(1998, 2)))
        .await
        .unwrap();
    assert_eq!(placed.total, Decimal::new(1998, 2));
    assert_eq!(placed.status, OrderStatus::Pending);
    assert_eq!(placed.items[0].product.name, "Widget");

    let shipped = api
        .update_order_status(placed.id, OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);
    assert_eq!(api.list_orders().await.unwrap()[0].status, OrderStatus::Shipped);

    let err = api
        .create_order(&order_for(widget.id, 10, Decimal::new(9990, 2)))
        .await
        .unwrap_err();
    match err {
        ApiError::Validation(message) => assert!(message.contains("Insufficient stock"), "{message}"),
        other => panic!("expected a validation error, got {other:?}"),
    }

    api.delete_order(placed.id).await.unwrap();
    assert!(matches!(
        api.delete_order(placed.id).await,
        Err(ApiError::NotFound(message)) if message == "Order not found"
    ));
}

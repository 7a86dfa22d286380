//! HTTP route handlers for admin.
//!
//! Every endpoint speaks JSON inside the `{success, data, error}` envelope
//! except the CSV export and the health probes.

pub mod admins;
pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod seed;

use axum::{
    Router,
    extract::{FromRequest, FromRequestParts, State},
    http::StatusCode,
    routing::get,
};

use crate::{error::AppError, state::AppState};

/// JSON body extractor whose rejections render as the error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query-string extractor whose rejections render as the error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Path extractor whose rejections render as the error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(products::router())
        .merge(orders::router())
        .merge(customers::router())
        .merge(admins::router())
        .merge(auth::router())
        .merge(seed::router())
        .merge(dashboard::router())
}

/// Health check endpoint (liveness).
async fn health() -> &'static str {
    "ok"
}

/// Readiness check endpoint - verifies the store is reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

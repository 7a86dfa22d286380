//! Order route handlers.
//!
//! Listing and placing orders are anonymous unless public order intake is
//! switched off in the configuration.

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use shopdesk_core::{
    ApiResponse, NewOrder, OrderId, OrderStatus, OrderView, StatusFilter, export::export_file_name,
    filter_orders, orders_csv,
};

use super::{ApiJson, ApiPath, ApiQuery};
use crate::{
    error::AppError,
    middleware::{OptionalAdminAuth, RequireAdminAuth},
    services::OrderService,
    state::AppState,
};

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list).post(create))
        .route("/api/orders/export", get(export))
        .route("/api/orders/{id}", axum::routing::patch(update_status).delete(delete))
}

/// Reject anonymous callers when public order intake is off.
fn check_intake(state: &AppState, admin: &OptionalAdminAuth) -> Result<(), AppError> {
    if state.config().public_order_intake || admin.0.is_some() {
        Ok(())
    } else {
        Err(AppError::unauthorized())
    }
}

/// Every order, newest first, with products expanded.
///
/// # Errors
///
/// Returns 401 when public order intake is off and nobody is signed in.
#[instrument(skip(state, admin))]
pub async fn list(
    State(state): State<AppState>,
    admin: OptionalAdminAuth,
) -> Result<Json<ApiResponse<Vec<OrderView>>>, AppError> {
    check_intake(&state, &admin)?;

    let orders = OrderService::new(state.store()).list().await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// Place an order.
///
/// # Errors
///
/// Returns 400 for a malformed order, an unknown product or insufficient stock.
#[instrument(skip(state, admin, request), fields(customer = %request.customer_email))]
pub async fn create(
    State(state): State<AppState>,
    admin: OptionalAdminAuth,
    ApiJson(request): ApiJson<NewOrder>,
) -> Result<(StatusCode, Json<ApiResponse<OrderView>>), AppError> {
    check_intake(&state, &admin)?;

    let order = OrderService::new(state.store()).place(&request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(order))))
}

/// Status change request. The status is optional so a missing field can be
/// reported with a specific message.
#[derive(Debug, Deserialize)]
pub struct StatusPatch {
    pub status: Option<String>,
}

/// Change an order's status. Any status may follow any other.
///
/// # Errors
///
/// Returns 400 for a missing or unknown status and 404 if the order does not exist.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<OrderId>,
    ApiJson(patch): ApiJson<StatusPatch>,
) -> Result<Json<ApiResponse<OrderView>>, AppError> {
    let status: OrderStatus = patch
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Status is required".to_owned()))?
        .parse()
        .map_err(|e: shopdesk_core::ParseOrderStatusError| AppError::BadRequest(e.to_string()))?;

    let order = state
        .store()
        .set_order_status(id, status)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    tracing::info!(order_id = %id, status = %status, "Order status updated");
    let view = OrderService::new(state.store()).expand_one(order).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// Delete an order. Reserved stock is not returned to the catalog.
///
/// # Errors
///
/// Returns 404 if the order does not exist.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if !state.store().delete_order(id).await? {
        return Err(AppError::NotFound("Order not found".to_owned()));
    }

    tracing::info!(order_id = %id, "Order deleted");
    Ok(Json(ApiResponse::ok(())))
}

/// Export filter parameters, matching the order table's search box and
/// status dropdown.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub search: Option<String>,
    pub status: Option<String>,
}

/// Download the filtered order table as CSV.
///
/// # Errors
///
/// Returns 400 for an unknown status filter.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn export(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ExportQuery>,
) -> Result<Response, AppError> {
    let status = StatusFilter::parse(params.status.as_deref())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let orders = OrderService::new(state.store()).list().await?;
    let visible = filter_orders(&orders, params.search.as_deref().unwrap_or_default(), status);
    let csv = orders_csv(&visible);

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(chrono::Utc::now().date_naive())
    );

    tracing::info!(rows = visible.len(), "Orders exported");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

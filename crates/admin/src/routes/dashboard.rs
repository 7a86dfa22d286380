//! Dashboard tiles route handler.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use shopdesk_core::{ApiResponse, DashboardStats};

use crate::{
    error::AppError, middleware::RequireAdminAuth, services::OrderService, state::AppState,
};

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/dashboard", get(stats))
}

/// Revenue, sales, stock and category tiles plus the latest orders.
///
/// # Errors
///
/// Returns 500 if products or orders cannot be read.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn stats(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let products = state.store().all_products().await?;
    let orders = OrderService::new(state.store()).list().await?;

    Ok(Json(ApiResponse::ok(DashboardStats::compute(
        &products, &orders,
    ))))
}

//! Customers route handler.
//!
//! The roster is folded from the order table on every read and never stored.

use axum::{Json, Router, extract::State, routing::get};
use serde::Deserialize;
use tracing::instrument;

use shopdesk_core::{ApiResponse, Customer, aggregate_customers, filter_customers};

use super::ApiQuery;
use crate::{error::AppError, middleware::RequireAdminAuth, state::AppState};

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/customers", get(list))
}

/// Roster search parameters.
#[derive(Debug, Deserialize)]
pub struct CustomersQuery {
    pub search: Option<String>,
}

/// Customer roster, grouped by case-insensitive email, in the order each
/// customer first appears in the newest-first order list.
///
/// # Errors
///
/// Returns 500 if the orders cannot be read.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn list(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CustomersQuery>,
) -> Result<Json<ApiResponse<Vec<Customer>>>, AppError> {
    let orders = state.store().list_orders().await?;
    let roster = aggregate_customers(&orders);

    let customers = filter_customers(&roster, params.search.as_deref().unwrap_or_default())
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ApiResponse::ok(customers)))
}

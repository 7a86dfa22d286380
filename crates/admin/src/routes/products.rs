//! Product route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use shopdesk_core::{ApiResponse, PageRequest, Pagination, Product, ProductId, ProductInput};

use super::{ApiJson, ApiPath, ApiQuery};
use crate::{error::AppError, middleware::RequireAdminAuth, state::AppState};

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(create))
        .route(
            "/api/products/{id}",
            get(show).put(replace).delete(delete),
        )
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub query: Option<String>,
}

/// Paginated product listing, newest first.
///
/// # Errors
///
/// Returns 400 for a page or limit below 1.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let request = PageRequest::new(params.page, params.limit)?;
    let query = params.query.as_deref().unwrap_or_default();

    let (products, total) = state.store().search_products(query, request).await?;

    Ok(Json(ApiResponse::page(
        products,
        Pagination::new(total, request),
    )))
}

/// Create a product.
///
/// # Errors
///
/// Returns 400 if the product fails validation.
#[instrument(skip(admin, state, input), fields(admin_id = %admin.id))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), AppError> {
    let input = input.validated()?;
    let product = state.store().create_product(&input).await?;

    tracing::info!(product_id = %product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

/// Get one product.
///
/// # Errors
///
/// Returns 404 if the product does not exist.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let product = state
        .store()
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(ApiResponse::ok(product)))
}

/// Replace every field of a product.
///
/// # Errors
///
/// Returns 400 if the product fails validation and 404 if it does not exist.
#[instrument(skip(admin, state, input), fields(admin_id = %admin.id))]
pub async fn replace(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let input = input.validated()?;
    let product = state
        .store()
        .replace_product(id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    tracing::info!(product_id = %product.id, "Product updated");
    Ok(Json(ApiResponse::ok(product)))
}

/// Delete a product. Orders keep their reference to it.
///
/// # Errors
///
/// Returns 404 if the product does not exist.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if !state.store().delete_product(id).await? {
        return Err(AppError::NotFound("Product not found".to_owned()));
    }

    tracing::info!(product_id = %id, "Product deleted");
    Ok(Json(ApiResponse::ok(())))
}

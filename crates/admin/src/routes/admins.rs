//! Admin account route handlers.
//!
//! Accounts can be listed and created. There is no update or delete.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;
use tracing::instrument;

use shopdesk_core::{AdminAccount, ApiResponse};

use super::ApiJson;
use crate::{
    error::AppError, middleware::RequireAdminAuth, services::AdminAuthService, state::AppState,
};

/// Build the admins router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/admins", get(list).post(create))
}

/// All admins, newest first. Password hashes never leave the store.
///
/// # Errors
///
/// Returns 500 if the admins cannot be read.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn list(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AdminAccount>>>, AppError> {
    let admins = state.store().list_admins().await?;
    Ok(Json(ApiResponse::ok(admins)))
}

/// Onboarding form.
#[derive(Deserialize)]
pub struct CreateAdminRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Create an admin account.
///
/// # Errors
///
/// Returns 400 for a missing field, a malformed email or a taken email.
#[instrument(skip(admin, state, request), fields(admin_id = %admin.id))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateAdminRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AdminAccount>>), AppError> {
    let account = AdminAuthService::new(state.store())
        .create_admin(&request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(account))))
}

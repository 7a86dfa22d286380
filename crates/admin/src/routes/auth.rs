//! Authentication route handlers.
//!
//! Email and password login backed by the session cookie.

use axum::{Json, Router, extract::State, routing::{get, post}};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopdesk_core::ApiResponse;

use super::ApiJson;
use crate::{
    error::{AppError, clear_sentry_user, set_sentry_user},
    middleware::{RequireAdminAuth, clear_current_admin, set_current_admin},
    models::CurrentAdmin,
    services::AdminAuthService,
    state::AppState,
};

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}

/// Login form.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Verify credentials and store the admin in the session.
///
/// # Errors
///
/// Returns 400 for a missing field and 401 for wrong credentials.
#[instrument(skip(state, session, request))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<CurrentAdmin>>, AppError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest("Email and password required".to_owned()));
    }

    let account = AdminAuthService::new(state.store())
        .login(&request.email, &request.password)
        .await?;

    let current = CurrentAdmin::from(&account);
    set_current_admin(&session, &current).await?;
    set_sentry_user(current.id.as_i32(), Some(current.email.as_str()));

    tracing::info!(admin_id = %current.id, "Admin logged in");
    Ok(Json(ApiResponse::ok(current)))
}

/// Logout and clear session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Json<ApiResponse<()>> {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::warn!(error = %e, "Failed to clear session on logout");
    }
    clear_sentry_user();
    Json(ApiResponse::ok(()))
}

/// The signed-in admin.
pub async fn me(RequireAdminAuth(admin): RequireAdminAuth) -> Json<ApiResponse<CurrentAdmin>> {
    Json(ApiResponse::ok(admin))
}

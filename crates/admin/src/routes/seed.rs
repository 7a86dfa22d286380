//! Demo data seed endpoint, guarded by a shared secret.

use axum::{Json, Router, extract::State, routing::get};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use shopdesk_core::ApiResponse;

use super::ApiQuery;
use crate::{
    error::AppError,
    services::{SeedReport, seed},
    state::AppState,
};

/// Build the seed router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/seed", get(run))
}

/// Seed query parameters.
#[derive(Deserialize)]
pub struct SeedQuery {
    pub secret: Option<String>,
}

/// Seed whatever is missing. Always 401 when no seed secret is configured.
///
/// # Errors
///
/// Returns 401 for a missing or wrong secret.
#[instrument(skip_all)]
pub async fn run(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SeedQuery>,
) -> Result<Json<ApiResponse<SeedReport>>, AppError> {
    let config = &state.config().seed;

    let authorized = matches!(
        (&config.secret, params.secret.as_deref()),
        (Some(expected), Some(given)) if expected.expose_secret() == given
    );
    if !authorized {
        tracing::warn!("Seed request with missing or wrong secret");
        return Err(AppError::unauthorized());
    }

    let report = seed(state.store(), config).await?;
    Ok(Json(ApiResponse::ok(report)))
}

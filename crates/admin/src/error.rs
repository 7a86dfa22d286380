//! Unified error handling for the admin API.
//!
//! Every error renders as the response envelope `{success: false, error}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use shopdesk_core::{ApiResponse, PageRequestError, ProductValidationError};

use crate::db::RepositoryError;
use crate::services::{AdminAuthError, OrderServiceError, SeedError};

/// Message returned for any failure whose details stay server-side.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("{0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 401 with the standard message.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::Unauthorized("Unauthorized".to_owned())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Validation(_) | RepositoryError::Conflict(_))
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// The message shown to clients.
    fn public_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_owned(),
            Self::Database(RepositoryError::Validation(message)) => message.clone(),
            Self::Database(RepositoryError::Conflict(_)) => {
                "Request conflicts with existing data".to_owned()
            }
            Self::Database(_) | Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_owned(),
            Self::NotFound(message) | Self::Unauthorized(message) | Self::BadRequest(message) => {
                message.clone()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let body = ApiResponse::<()>::failure(self.public_message());
        (status, Json(body)).into_response()
    }
}

impl From<AdminAuthError> for AppError {
    fn from(err: AdminAuthError) -> Self {
        match err {
            AdminAuthError::MissingCredentials | AdminAuthError::InvalidEmail(_) => {
                Self::BadRequest(err.to_string())
            }
            AdminAuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AdminAuthError::AlreadyExists => Self::BadRequest("Failed to create admin".to_owned()),
            AdminAuthError::PasswordHash(message) => Self::Internal(message),
            AdminAuthError::Repository(repo) => Self::Database(repo),
        }
    }
}

impl From<OrderServiceError> for AppError {
    fn from(err: OrderServiceError) -> Self {
        match err {
            OrderServiceError::Invalid(invalid) => Self::BadRequest(invalid.to_string()),
            OrderServiceError::Repository(repo) => Self::Database(repo),
        }
    }
}

impl From<SeedError> for AppError {
    fn from(err: SeedError) -> Self {
        match err {
            SeedError::Admin(auth) => auth.into(),
            SeedError::Repository(repo) => Self::Database(repo),
            SeedError::Product(_) | SeedError::Email(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<ProductValidationError> for AppError {
    fn from(err: ProductValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<PageRequestError> for AppError {
    fn from(err: PageRequestError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session error: {err}"))
    }
}

/// Set the Sentry user context from an admin.
pub fn set_sentry_user(admin_id: i32, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

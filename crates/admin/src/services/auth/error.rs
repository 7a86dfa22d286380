//! Admin authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Email or password missing from the request.
    #[error("Email and password required")]
    MissingCredentials,

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] shopdesk_core::EmailError),

    /// Unknown email or wrong password. The two are not distinguished.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Admin with this email already exists.
    #[error("admin already exists")]
    AlreadyExists,

    /// The password could not be hashed.
    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for AdminAuthError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(_) => Self::AlreadyExists,
            other => Self::Repository(other),
        }
    }
}

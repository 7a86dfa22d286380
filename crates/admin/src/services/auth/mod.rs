//! Admin authentication service.
//!
//! Email and password login against argon2 PHC hashes, and admin onboarding.

mod error;

pub use error::AdminAuthError;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use shopdesk_core::{AdminAccount, Email};

use crate::db::Store;

/// Hash a password with argon2 and a random salt, as a PHC string.
///
/// # Errors
///
/// Returns `AdminAuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AdminAuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AdminAuthError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash. Unparseable hashes never match.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    store: &'a dyn Store,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Verify an email and password.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` for an unknown email, a
    /// malformed email or a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminAccount, AdminAuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AdminAuthError::InvalidCredentials);
        };

        let Some((account, hash)) = self.store.find_admin_login(&email).await? else {
            tracing::info!(email = %email, "Login attempt for unknown admin");
            return Err(AdminAuthError::InvalidCredentials);
        };

        if !verify_password(password, &hash) {
            tracing::info!(admin_id = %account.id, "Login attempt with wrong password");
            return Err(AdminAuthError::InvalidCredentials);
        }

        Ok(account)
    }

    /// Create an admin account.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::MissingCredentials` if either field is blank,
    /// `AdminAuthError::InvalidEmail` if the email does not parse and
    /// `AdminAuthError::AlreadyExists` if the email is taken.
    pub async fn create_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AdminAccount, AdminAuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AdminAuthError::MissingCredentials);
        }
        let email = Email::parse(email)?;
        let hash = hash_password(password)?;

        let account = self.store.create_admin(&email, &hash).await?;
        tracing::info!(admin_id = %account.id, email = %account.email, "Admin created");
        Ok(account)
    }
}

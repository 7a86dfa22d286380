//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! shopdesk-cli admin create -e admin@example.com -p 'a long password'
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string for admin database

use shopdesk_admin::db::PgStore;
use shopdesk_admin::services::AdminAuthService;
use shopdesk_core::AdminId;

/// Create a new admin account with an argon2-hashed password.
///
/// # Returns
///
/// The ID of the created admin.
///
/// # Errors
///
/// Returns an error if the email is malformed or taken, or the database is unreachable.
pub async fn create(email: &str, password: &str) -> Result<AdminId, Box<dyn std::error::Error>> {
    let store = PgStore::new(super::connect().await?);

    tracing::info!("Creating admin: {}", email);
    let account = AdminAuthService::new(&store)
        .create_admin(email, password)
        .await?;

    tracing::info!(
        "Admin created successfully! ID: {}, Email: {}",
        account.id,
        account.email
    );
    Ok(account.id)
}

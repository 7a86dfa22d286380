//! Session middleware configuration for admin.
//!
//! Cookie sessions via tower-sessions (SameSite=Strict, 24hr inactivity
//! expiry). Postgres-backed in production, in memory for the memory store.

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "shopdesk_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the `PostgreSQL` session store over the `shop.session` table.
///
/// # Errors
///
/// Returns the rejection message if the schema or table name is invalid.
pub fn postgres_session_store(pool: &PgPool) -> Result<PostgresStore, String> {
    // The session table is created by the migrations in the shop schema.
    PostgresStore::new(pool.clone())
        .with_schema_name("shop")?
        .with_table_name("session")
}

/// Create the session layer over any session store.
///
/// # Arguments
///
/// * `store` - Session store (Postgres or in-memory)
/// * `config` - Admin configuration (for determining HTTPS mode)
#[must_use]
pub fn create_session_layer<S>(store: S, config: &AdminConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.secure_cookies())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}

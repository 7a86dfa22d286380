//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use shopdesk_admin::config;
use sqlx::PgPool;

/// Load `.env` and connect to the admin database.
async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = config::database_url()?;

    tracing::info!("Connecting to admin database...");
    Ok(shopdesk_admin::db::create_pool(&database_url).await?)
}

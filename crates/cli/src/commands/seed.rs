//! Seed the database with the default admin, demo catalog and demo orders.
//!
//! Each collection is only seeded while empty, so the command can be re-run.

use tracing::info;

use shopdesk_admin::config::SeedConfig;
use shopdesk_admin::db::PgStore;
use shopdesk_admin::services::seed;

/// Seed whatever is missing.
///
/// # Errors
///
/// Returns an error if configuration is invalid or a database write fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = PgStore::new(super::connect().await?);
    let config = SeedConfig::from_env()?;

    let report = seed(&store, &config).await?;

    info!("Seeding complete!");
    info!("  Admins created: {}", report.admins_created);
    info!("  Products created: {}", report.products_created);
    info!("  Orders created: {}", report.orders_created);
    Ok(())
}

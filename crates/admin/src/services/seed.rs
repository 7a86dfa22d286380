//! Demo data seeding.
//!
//! Each collection is seeded independently and only when it is empty, so
//! running the seed again creates nothing.
//!
//! Seed runs within one process are serialized. Separate processes seeding
//! the same database at the same moment are not guarded against each other.

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use shopdesk_core::{
    Email, NewLineItem, OrderStatus, Product, ProductInput, ProductValidationError,
};

use super::auth::{AdminAuthError, AdminAuthService};
use crate::config::SeedConfig;
use crate::db::{OrderDraft, RepositoryError, Store};

/// Errors from seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to seed admin: {0}")]
    Admin(#[from] AdminAuthError),

    #[error("invalid seed product: {0}")]
    Product(#[from] ProductValidationError),

    #[error("invalid seed email: {0}")]
    Email(#[from] shopdesk_core::EmailError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// What a seed run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub admins_created: u32,
    pub products_created: u32,
    pub orders_created: u32,
}

/// name, price in cents, stock, category, description
const SEED_PRODUCTS: [(&str, i64, i32, &str, &str); 7] = [
    ("Pro Gaming Headset", 12_999, 45, "Electronics", "Immersive sound."),
    ("Ergonomic Office Chair", 29_999, 12, "Furniture", "Comfort all day."),
    ("Mechanical Keyboard", 8_999, 25, "Electronics", "Clicky keys."),
    ("Leather Wallet", 4_999, 100, "Accessories", "Genuine leather."),
    ("Running Shoes", 7_999, 30, "Footwear", "Fast and light."),
    ("4K Monitor", 39_999, 8, "Electronics", "Crystal clear."),
    ("Standing Desk", 54_999, 5, "Furniture", "Healthy work."),
];

struct SeedOrder {
    customer_name: &'static str,
    customer_email: &'static str,
    status: OrderStatus,
    /// Positions into the catalog (oldest first) with quantities.
    items: &'static [(usize, i32)],
}

const SEED_ORDERS: [SeedOrder; 3] = [
    SeedOrder {
        customer_name: "Alice Johnson",
        customer_email: "alice@example.com",
        status: OrderStatus::Delivered,
        items: &[(0, 1), (2, 1)],
    },
    SeedOrder {
        customer_name: "Bob Smith",
        customer_email: "bob@test.com",
        status: OrderStatus::Processing,
        items: &[(1, 1)],
    },
    SeedOrder {
        customer_name: "Charlie Brown",
        customer_email: "charlie@gmail.com",
        status: OrderStatus::Delivered,
        items: &[(3, 1)],
    },
];

/// Held for a whole seed run so the empty checks and inserts of concurrent
/// calls do not interleave.
static SEED_LOCK: Mutex<()> = Mutex::const_new(());

/// Seed the default admin, catalog and demo orders where missing.
///
/// Demo orders only reference products that exist and do not reserve stock.
///
/// # Errors
///
/// Returns `SeedError` if a write fails.
pub async fn seed(store: &dyn Store, config: &SeedConfig) -> Result<SeedReport, SeedError> {
    let _guard = SEED_LOCK.lock().await;
    let mut report = SeedReport::default();

    if store.count_admins().await? == 0 {
        AdminAuthService::new(store)
            .create_admin(&config.admin_email, config.admin_password.expose_secret())
            .await?;
        report.admins_created = 1;
    }

    let catalog: Vec<Product> = if store.count_products().await? == 0 {
        let mut created = Vec::with_capacity(SEED_PRODUCTS.len());
        for (name, cents, stock, category, description) in SEED_PRODUCTS {
            let input = ProductInput {
                name: name.to_owned(),
                description: description.to_owned(),
                price: Decimal::new(cents, 2),
                stock,
                category: category.to_owned(),
                images: Vec::new(),
            }
            .validated()?;
            created.push(store.create_product(&input).await?);
        }
        report.products_created = u32::try_from(created.len()).unwrap_or(u32::MAX);
        created
    } else {
        let mut existing = store.all_products().await?;
        existing.reverse();
        existing
    };

    if store.count_orders().await? == 0 && !catalog.is_empty() {
        for seed_order in &SEED_ORDERS {
            let items: Vec<NewLineItem> = seed_order
                .items
                .iter()
                .filter_map(|&(position, quantity)| {
                    catalog.get(position).map(|product| NewLineItem {
                        product: product.id,
                        quantity,
                    })
                })
                .collect();
            if items.is_empty() {
                continue;
            }

            store
                .create_order(&OrderDraft {
                    customer_name: seed_order.customer_name.to_owned(),
                    customer_email: Email::parse(seed_order.customer_email)?,
                    status: seed_order.status,
                    items,
                    reserve_stock: false,
                })
                .await?;
            report.orders_created += 1;
        }
    }

    tracing::info!(
        admins = report.admins_created,
        products = report.products_created,
        orders = report.orders_created,
        "Seed complete"
    );
    Ok(report)
}

//! Persistence for the admin dashboard.
//!
//! # Backends
//!
//! - [`PgStore`] - `PostgreSQL`, schema `shop`
//! - [`MemoryStore`] - process-local, for local runs and tests
//!
//! Both implement the [`Store`] trait, which route handlers reach through
//! `AppState::store()`.
//!
//! ## Tables
//!
//! - `shop.product` - Catalog products
//! - `shop.customer_order` / `shop.order_item` - Orders and their line items
//! - `shop.admin_account` - Dashboard administrators
//! - `shop.session` - Session storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p shopdesk-cli -- migrate
//! ```

pub mod admins;
pub mod memory;
pub mod orders;
pub mod products;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use shopdesk_core::{
    AdminAccount, AdminId, Email, NewLineItem, Order, OrderId, OrderStatus, PageRequest, Product,
    ProductId, ProductInput,
};

pub use admins::AdminRepository;
pub use memory::MemoryStore;
pub use orders::OrderRepository;
pub use products::ProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The request cannot be applied to the current data (unknown product,
    /// insufficient stock).
    #[error("{0}")]
    Validation(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// An order about to be written.
///
/// Unit prices are not part of the draft: the store reads them from the
/// catalog inside the same transaction that writes the order.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_name: String,
    pub customer_email: Email,
    pub status: OrderStatus,
    pub items: Vec<NewLineItem>,
    /// Decrement product stock by the ordered quantities. Orders are
    /// rejected when any product lacks the stock.
    pub reserve_stock: bool,
}

/// Catalog persistence.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// One page of products whose name contains `query` (case-insensitive),
    /// newest first, plus the total number of matches.
    async fn search_products(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<(Vec<Product>, u64), RepositoryError>;

    /// Every product, newest first.
    async fn all_products(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Products with the given ids. Unknown ids are skipped.
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;

    async fn create_product(&self, input: &ProductInput) -> Result<Product, RepositoryError>;

    /// Replace every field of a product. `None` when the product does not exist.
    async fn replace_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError>;

    /// Returns `false` when the product did not exist.
    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError>;

    async fn count_products(&self) -> Result<u64, RepositoryError>;
}

/// Order persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Every order, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError>;

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Write an order, pricing its line items from the catalog.
    ///
    /// Fails with [`RepositoryError::Validation`] when a product does not exist
    /// or, with `reserve_stock`, lacks the stock. Nothing is written on failure.
    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, RepositoryError>;

    /// `None` when the order does not exist.
    async fn set_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError>;

    /// Returns `false` when the order did not exist. Stock is not restored.
    async fn delete_order(&self, id: OrderId) -> Result<bool, RepositoryError>;

    async fn count_orders(&self) -> Result<u64, RepositoryError>;
}

/// Administrator persistence.
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// Every admin, newest first.
    async fn list_admins(&self) -> Result<Vec<AdminAccount>, RepositoryError>;

    /// Look up an admin by email (case-insensitive) along with the stored
    /// password hash.
    async fn find_admin_login(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminAccount, String)>, RepositoryError>;

    async fn get_admin(&self, id: AdminId) -> Result<Option<AdminAccount>, RepositoryError>;

    /// Fails with [`RepositoryError::Conflict`] when the email is taken
    /// (case-insensitive).
    async fn create_admin(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<AdminAccount, RepositoryError>;

    async fn count_admins(&self) -> Result<u64, RepositoryError>;
}

/// The complete persistence surface used by the server.
#[async_trait]
pub trait Store: ProductStore + OrderStore + AdminStore {
    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed [`Store`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn search_products(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<(Vec<Product>, u64), RepositoryError> {
        ProductRepository::new(&self.pool).search(query, page).await
    }

    async fn all_products(&self) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).list_all().await
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).get_by_id(id).await
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).get_by_ids(ids).await
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        ProductRepository::new(&self.pool).create(input).await
    }

    async fn replace_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).replace(id, input).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        ProductRepository::new(&self.pool).delete(id).await
    }

    async fn count_products(&self) -> Result<u64, RepositoryError> {
        ProductRepository::new(&self.pool).count().await
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        OrderRepository::new(&self.pool).list_all().await
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        OrderRepository::new(&self.pool).get_by_id(id).await
    }

    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, RepositoryError> {
        OrderRepository::new(&self.pool).create(draft).await
    }

    async fn set_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        OrderRepository::new(&self.pool).set_status(id, status).await
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool, RepositoryError> {
        OrderRepository::new(&self.pool).delete(id).await
    }

    async fn count_orders(&self) -> Result<u64, RepositoryError> {
        OrderRepository::new(&self.pool).count().await
    }
}

#[async_trait]
impl AdminStore for PgStore {
    async fn list_admins(&self) -> Result<Vec<AdminAccount>, RepositoryError> {
        AdminRepository::new(&self.pool).list_all().await
    }

    async fn find_admin_login(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminAccount, String)>, RepositoryError> {
        AdminRepository::new(&self.pool).get_login(email).await
    }

    async fn get_admin(&self, id: AdminId) -> Result<Option<AdminAccount>, RepositoryError> {
        AdminRepository::new(&self.pool).get_by_id(id).await
    }

    async fn create_admin(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<AdminAccount, RepositoryError> {
        AdminRepository::new(&self.pool)
            .create(email, password_hash)
            .await
    }

    async fn count_admins(&self) -> Result<u64, RepositoryError> {
        AdminRepository::new(&self.pool).count().await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Convert a `COUNT(*)` result to `u64`.
pub(crate) fn count_to_u64(count: i64) -> Result<u64, RepositoryError> {
    u64::try_from(count)
        .map_err(|_| RepositoryError::DataCorruption(format!("negative row count: {count}")))
}

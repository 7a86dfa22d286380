//! Order repository for database operations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use shopdesk_core::orders::line_items_total;
use shopdesk_core::{Email, LineItem, Money, Order, OrderId, OrderStatus, ProductId};

use super::{OrderDraft, RepositoryError, count_to_u64};

// =============================================================================
// Pricing
// =============================================================================

/// Catalog facts needed to price and reserve a line item.
#[derive(Debug, Clone)]
pub(crate) struct CatalogEntry {
    pub name: String,
    pub price: Money,
    pub stock: i32,
}

/// A priced order: line items with catalog unit prices, their total, and
/// the stock to take per product (empty unless the draft reserves stock).
#[derive(Debug)]
pub(crate) struct PricedOrder {
    pub items: Vec<LineItem>,
    pub total: Money,
    pub reservations: Vec<(ProductId, i32)>,
}

/// Price a draft against catalog entries and check stock.
///
/// Quantities for a product that appears on several lines are summed before
/// the stock check. A total that does not fit a stored amount is rejected.
pub(crate) fn price_draft(
    draft: &OrderDraft,
    catalog: &HashMap<ProductId, CatalogEntry>,
) -> Result<PricedOrder, RepositoryError> {
    let mut items = Vec::with_capacity(draft.items.len());
    let mut demand: Vec<(ProductId, i32)> = Vec::new();

    for requested in &draft.items {
        let entry = catalog.get(&requested.product).ok_or_else(|| {
            RepositoryError::Validation(format!("Product {} not found", requested.product))
        })?;
        items.push(LineItem {
            product: requested.product,
            quantity: requested.quantity,
            price: entry.price,
        });
        match demand.iter_mut().find(|(id, _)| *id == requested.product) {
            Some((_, quantity)) => *quantity = quantity.saturating_add(requested.quantity),
            None => demand.push((requested.product, requested.quantity)),
        }
    }

    let total = line_items_total(&items)
        .ok_or_else(|| RepositoryError::Validation("Order total is too large".to_owned()))?;

    if !draft.reserve_stock {
        return Ok(PricedOrder {
            items,
            total,
            reservations: Vec::new(),
        });
    }

    for (id, quantity) in &demand {
        if let Some(entry) = catalog.get(id)
            && entry.stock < *quantity
        {
            return Err(RepositoryError::Validation(format!(
                "Insufficient stock for {} ({} available)",
                entry.name, entry.stock
            )));
        }
    }

    Ok(PricedOrder {
        items,
        total,
        reservations: demand,
    })
}

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_name: String,
    customer_email: String,
    total: Decimal,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Internal row type for `PostgreSQL` line item queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    order_id: i32,
    product_id: i32,
    quantity: i32,
    unit_price: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    id: i32,
    name: String,
    price: Decimal,
    stock: i32,
}

impl OrderRow {
    fn into_order(self, items: Vec<LineItem>) -> Result<Order, RepositoryError> {
        let customer_email = Email::parse(&self.customer_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            customer_name: self.customer_name,
            customer_email,
            total: self.total,
            status: self.status,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<OrderItemRow> for LineItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            product: ProductId::new(row.product_id),
            quantity: row.quantity,
            price: row.unit_price,
        }
    }
}

const ORDER_COLUMNS: &str =
    "id, customer_name, customer_email, total, status, created_at, updated_at";

/// Attach line items (already in position order) to their orders.
fn assemble(
    rows: Vec<OrderRow>,
    item_rows: Vec<OrderItemRow>,
) -> Result<Vec<Order>, RepositoryError> {
    let mut items_by_order: HashMap<i32, Vec<LineItem>> = HashMap::new();
    for item in item_rows {
        items_by_order
            .entry(item.order_id)
            .or_default()
            .push(item.into());
    }

    rows.into_iter()
        .map(|row| {
            let items = items_by_order.remove(&row.id).unwrap_or_default();
            row.into_order(items)
        })
        .collect()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every order with its line items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored email is invalid.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.customer_order ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            r"SELECT order_id, product_id, quantity, unit_price
              FROM shop.order_item
              ORDER BY order_id, position",
        )
        .fetch_all(self.pool)
        .await?;

        assemble(rows, item_rows)
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.customer_order WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let items = self.items_for(id).await?;
        row.into_order(items).map(Some)
    }

    async fn items_for(&self, id: OrderId) -> Result<Vec<LineItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"SELECT order_id, product_id, quantity, unit_price
              FROM shop.order_item
              WHERE order_id = $1
              ORDER BY position",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create an order in one transaction.
    ///
    /// The referenced product rows are locked, the line items are priced from
    /// them, the order and its items are inserted and, when the draft reserves
    /// stock, the products' stock is decremented.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` for unknown products or
    /// insufficient stock.
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn create(&self, draft: &OrderDraft) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let ids: Vec<i32> = draft.items.iter().map(|item| item.product.as_i32()).collect();
        let catalog: HashMap<ProductId, CatalogEntry> = sqlx::query_as::<_, CatalogRow>(
            r"SELECT id, name, price, stock
              FROM shop.product
              WHERE id = ANY($1)
              ORDER BY id
              FOR UPDATE",
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|row| {
            (
                ProductId::new(row.id),
                CatalogEntry {
                    name: row.name,
                    price: row.price,
                    stock: row.stock,
                },
            )
        })
        .collect();

        let priced = price_draft(draft, &catalog)?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"INSERT INTO shop.customer_order (customer_name, customer_email, total, status)
              VALUES ($1, $2, $3, $4)
              RETURNING {ORDER_COLUMNS}"
        ))
        .bind(draft.customer_name.trim())
        .bind(&draft.customer_email)
        .bind(priced.total)
        .bind(draft.status)
        .fetch_one(&mut *tx)
        .await?;

        for (position, item) in (0_i32..).zip(&priced.items) {
            sqlx::query(
                r"INSERT INTO shop.order_item (order_id, position, product_id, quantity, unit_price)
                  VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(row.id)
            .bind(position)
            .bind(item.product)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        for (product, quantity) in &priced.reservations {
            sqlx::query(
                "UPDATE shop.product SET stock = stock - $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(*product)
            .bind(*quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        row.into_order(priced.items)
    }

    /// Set an order's status.
    ///
    /// `updated_at` only moves when the status actually changes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"UPDATE shop.customer_order
              SET updated_at = CASE WHEN status = $2 THEN updated_at ELSE NOW() END,
                  status = $2
              WHERE id = $1
              RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let items = self.items_for(id).await?;
        row.into_order(items).map(Some)
    }

    /// Delete an order and its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.customer_order WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shop.customer_order")
            .fetch_one(self.pool)
            .await?;
        count_to_u64(count)
    }
}

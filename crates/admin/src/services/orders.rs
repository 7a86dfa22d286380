//! Order placement and product expansion.

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use shopdesk_core::{NewOrder, Order, OrderStatus, OrderValidationError, OrderView, ProductId};

use crate::db::{OrderDraft, RepositoryError, Store};

/// Errors from placing an order.
#[derive(Debug, Error)]
pub enum OrderServiceError {
    #[error(transparent)]
    Invalid(#[from] OrderValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Order operations that span products and orders.
pub struct OrderService<'a> {
    store: &'a dyn Store,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Every order, newest first, with product references expanded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a read fails.
    pub async fn list(&self) -> Result<Vec<OrderView>, RepositoryError> {
        let orders = self.store.list_orders().await?;
        self.expand(orders).await
    }

    /// Expand product references of `orders` against the current catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog read fails.
    pub async fn expand(&self, orders: Vec<Order>) -> Result<Vec<OrderView>, RepositoryError> {
        let ids: Vec<ProductId> = orders
            .iter()
            .flat_map(|order| order.items.iter().map(|item| item.product))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let catalog: HashMap<_, _> = self
            .store
            .products_by_ids(&ids)
            .await?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        Ok(orders
            .into_iter()
            .map(|order| OrderView::expand(order, &catalog))
            .collect())
    }

    /// Expand a single order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog read fails.
    pub async fn expand_one(&self, order: Order) -> Result<OrderView, RepositoryError> {
        let mut views = self.expand(vec![order]).await?;
        views.pop().ok_or(RepositoryError::NotFound)
    }

    /// Place an order submitted through the API.
    ///
    /// Unit prices and the total come from the catalog; a client-computed
    /// total that disagrees is logged and ignored. Stock is reserved in the
    /// same write.
    ///
    /// # Errors
    ///
    /// Returns `OrderServiceError::Invalid` for a malformed request and
    /// `OrderServiceError::Repository` for unknown products, insufficient
    /// stock or storage failures.
    pub async fn place(&self, request: &NewOrder) -> Result<OrderView, OrderServiceError> {
        let customer_email = request.validate()?;

        let draft = OrderDraft {
            customer_name: request.customer_name.trim().to_owned(),
            customer_email,
            status: OrderStatus::Pending,
            items: request.items.clone(),
            reserve_stock: true,
        };
        let order = self.store.create_order(&draft).await?;

        if let Some(client_total) = request.total
            && client_total != order.total
        {
            tracing::warn!(
                order_id = %order.id,
                client_total = %client_total,
                server_total = %order.total,
                "Client-submitted order total disagrees with catalog prices; stored the catalog total"
            );
        }

        tracing::info!(order_id = %order.id, total = %order.total, "Order placed");
        Ok(self.expand_one(order).await?)
    }
}

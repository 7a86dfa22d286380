//! Order management screen.
//!
//! The full order set is fetched once and filtered locally. Status changes
//! and deletions happen in two steps: `begin_*` edits the local rows and
//! returns a [`PendingChange`], which the caller renders before handing it
//! to [`OrdersView::confirm`]. A failed request reloads the whole set rather
//! than undoing the one row.

use shopdesk_core::{
    NewLineItem, NewOrder, OrderId, OrderStatus, OrderView, Product, StatusFilter, filter_orders,
    line_total, orders_csv,
};

use crate::api::{ApiError, ApiResult, DashboardApi};

/// A local edit already visible in the rows and not yet sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "the change is only sent by `OrdersView::confirm`"]
pub enum PendingChange {
    Status { id: OrderId, status: OrderStatus },
    Delete { id: OrderId },
}

/// Customer details entered on the create-order form.
#[derive(Debug, Clone)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
}

pub struct OrdersView<'a, A: DashboardApi + ?Sized> {
    api: &'a A,
    orders: Vec<OrderView>,
    search: String,
    status: StatusFilter,
}

impl<'a, A: DashboardApi + ?Sized> OrdersView<'a, A> {
    pub const fn new(api: &'a A) -> Self {
        Self {
            api,
            orders: Vec::new(),
            search: String::new(),
            status: StatusFilter::All,
        }
    }

    /// Fetch every order.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous rows are kept.
    pub async fn load(&mut self) -> ApiResult<()> {
        self.orders = self.api.list_orders().await?;
        Ok(())
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub const fn set_status_filter(&mut self, status: StatusFilter) {
        self.status = status;
    }

    /// Every loaded order, unfiltered.
    pub fn orders(&self) -> &[OrderView] {
        &self.orders
    }

    /// Rows matching the search box and status filter.
    pub fn visible(&self) -> Vec<&OrderView> {
        filter_orders(&self.orders, &self.search, self.status)
    }

    /// Show `status` on the order's row right away.
    pub fn begin_status_change(&mut self, id: OrderId, status: OrderStatus) -> PendingChange {
        if let Some(row) = self.orders.iter_mut().find(|o| o.id == id) {
            row.status = status;
        }
        PendingChange::Status { id, status }
    }

    /// Drop the order's row right away.
    pub fn begin_delete(&mut self, id: OrderId) -> PendingChange {
        self.orders.retain(|o| o.id != id);
        PendingChange::Delete { id }
    }

    /// Send a change made by `begin_*`. A status answer from the server
    /// replaces the row, so the last response wins.
    ///
    /// # Errors
    ///
    /// Returns the request error after reloading the order set.
    pub async fn confirm(&mut self, change: PendingChange) -> ApiResult<()> {
        let result = match change {
            PendingChange::Status { id, status } => {
                self.api.update_order_status(id, status).await.map(|updated| {
                    if let Some(row) = self.orders.iter_mut().find(|o| o.id == id) {
                        *row = updated;
                    }
                })
            }
            PendingChange::Delete { id } => self.api.delete_order(id).await,
        };

        if let Err(e) = &result {
            tracing::warn!(change = ?change, error = %e, "Order change failed; reloading orders");
            self.reconcile().await;
        }
        result
    }

    /// [`begin_status_change`](Self::begin_status_change) then
    /// [`confirm`](Self::confirm), for callers with nothing to render between.
    ///
    /// # Errors
    ///
    /// Returns the update error after reloading the order set.
    pub async fn change_status(&mut self, id: OrderId, status: OrderStatus) -> ApiResult<()> {
        let change = self.begin_status_change(id, status);
        self.confirm(change).await
    }

    /// [`begin_delete`](Self::begin_delete) then [`confirm`](Self::confirm).
    ///
    /// # Errors
    ///
    /// Returns the delete error after reloading the order set.
    pub async fn delete(&mut self, id: OrderId) -> ApiResult<()> {
        let change = self.begin_delete(id);
        self.confirm(change).await
    }

    /// Place an order for `quantity` of one product. The submitted total is
    /// `price × quantity` as shown on the form.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a quantity below 1 or a total too
    /// large to store, or the create error.
    pub async fn create(
        &mut self,
        product: &Product,
        quantity: i32,
        customer: CustomerDetails,
    ) -> ApiResult<OrderView> {
        if quantity < 1 {
            return Err(ApiError::Validation(
                "Quantity must be at least 1".to_owned(),
            ));
        }

        let total = line_total(product.price, quantity)
            .ok_or_else(|| ApiError::Validation("Order total is too large".to_owned()))?;

        let request = NewOrder {
            customer_name: customer.name,
            customer_email: customer.email,
            items: vec![NewLineItem {
                product: product.id,
                quantity,
            }],
            total: Some(total),
        };

        let created = self.api.create_order(&request).await?;
        tracing::info!(order_id = %created.id, "Order created");
        self.reconcile().await;
        Ok(created)
    }

    /// CSV of the visible rows only.
    pub fn export_csv(&self) -> String {
        orders_csv(&self.visible())
    }

    async fn reconcile(&mut self) {
        if let Err(e) = self.load().await {
            tracing::error!(error = %e, "Failed to reload orders");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fake::{FakeApi, order, product};
    use rust_decimal::Decimal;

    fn three_orders() -> FakeApi {
        FakeApi::with_orders(vec![
            order(3, "Charlie Brown", "charlie@gmail.com", 4_999, OrderStatus::Delivered),
            order(2, "Bob Smith", "bob@test.com", 29_999, OrderStatus::Processing),
            order(1, "Alice Johnson", "alice@example.com", 21_998, OrderStatus::Delivered),
        ])
    }

    #[tokio::test]
    async fn test_filters_narrow_visible_rows() {
        let api = three_orders();
        let mut view = OrdersView::new(&api);
        view.load().await.unwrap();
        assert_eq!(view.visible().len(), 3);

        view.set_status_filter(StatusFilter::Only(OrderStatus::Delivered));
        assert_eq!(view.visible().len(), 2);

        view.set_search("ALICE");
        let rows = view.visible();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].customer_name, "Alice Johnson");
    }

    #[tokio::test]
    async fn test_status_change_applies_server_row() {
        let api = three_orders();
        let mut view = OrdersView::new(&api);
        view.load().await.unwrap();

        view.change_status(OrderId::new(2), OrderStatus::Shipped)
            .await
            .unwrap();
        let row = view.orders().iter().find(|o| o.id == OrderId::new(2)).unwrap();
        assert_eq!(row.status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn test_pending_status_is_visible_before_confirm() {
        let api = three_orders();
        let mut view = OrdersView::new(&api);
        view.load().await.unwrap();
        view.set_status_filter(StatusFilter::Only(OrderStatus::Shipped));
        assert!(view.visible().is_empty());

        let change = view.begin_status_change(OrderId::new(2), OrderStatus::Shipped);
        let rows = view.visible();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, OrderId::new(2));
        // Nothing has reached the server yet.
        assert_eq!(
            api.state.lock().unwrap().orders[1].status,
            OrderStatus::Processing
        );

        view.confirm(change).await.unwrap();
        assert_eq!(
            api.state.lock().unwrap().orders[1].status,
            OrderStatus::Shipped
        );
        assert_eq!(view.visible().len(), 1);
    }

    #[tokio::test]
    async fn test_pending_delete_is_visible_before_confirm() {
        let api = three_orders();
        let mut view = OrdersView::new(&api);
        view.load().await.unwrap();

        let change = view.begin_delete(OrderId::new(3));
        assert_eq!(change, PendingChange::Delete { id: OrderId::new(3) });
        assert!(view.visible().iter().all(|o| o.id != OrderId::new(3)));
        assert_eq!(api.state.lock().unwrap().orders.len(), 3);

        api.state.lock().unwrap().fail_writes = true;
        assert!(view.confirm(change).await.is_err());
        // The failed delete reloaded the set, so the row is back.
        assert!(view.visible().iter().any(|o| o.id == OrderId::new(3)));
    }

    #[tokio::test]
    async fn test_failed_status_change_reloads() {
        let api = three_orders();
        let mut view = OrdersView::new(&api);
        view.load().await.unwrap();
        api.state.lock().unwrap().fail_writes = true;

        let result = view
            .change_status(OrderId::new(2), OrderStatus::Cancelled)
            .await;
        assert!(matches!(result, Err(ApiError::Server(_))));

        let row = view.orders().iter().find(|o| o.id == OrderId::new(2)).unwrap();
        assert_eq!(row.status, OrderStatus::Processing);
    }

    #[tokio::test]
    async fn test_delete_removes_row_and_reloads_on_failure() {
        let api = three_orders();
        let mut view = OrdersView::new(&api);
        view.load().await.unwrap();

        view.delete(OrderId::new(3)).await.unwrap();
        assert_eq!(view.orders().len(), 2);

        api.state.lock().unwrap().fail_writes = true;
        assert!(view.delete(OrderId::new(2)).await.is_err());
        assert_eq!(view.orders().len(), 2);
    }

    #[tokio::test]
    async fn test_create_submits_price_times_quantity() {
        let api = FakeApi::default();
        let mut view = OrdersView::new(&api);
        let widget = product(1, "Widget", 999);
        let customer = CustomerDetails {
            name: "Bob".to_owned(),
            email: "bob@test.com".to_owned(),
        };

        let err = view.create(&widget, 0, customer.clone()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(api.state.lock().unwrap().created_orders.is_empty());

        view.create(&widget, 3, customer).await.unwrap();
        let sent = api.state.lock().unwrap().created_orders[0].clone();
        assert_eq!(sent.total, Some(Decimal::new(2997, 2)));
        assert_eq!(sent.items[0].quantity, 3);
        // Reloaded after creation.
        assert_eq!(view.orders().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_total_beyond_stored_range() {
        let api = FakeApi::default();
        let mut view = OrdersView::new(&api);
        let mut pricey = product(1, "Yacht", 0);
        pricey.price = Decimal::MAX;
        let customer = CustomerDetails {
            name: "Bob".to_owned(),
            email: "bob@test.com".to_owned(),
        };

        let err = view.create(&pricey, 2, customer).await.unwrap_err();
        assert_eq!(err.to_string(), "Order total is too large");
        assert!(api.state.lock().unwrap().created_orders.is_empty());
    }

    #[tokio::test]
    async fn test_export_uses_visible_rows_only() {
        let api = three_orders();
        let mut view = OrdersView::new(&api);
        view.load().await.unwrap();
        view.set_status_filter(StatusFilter::Only(OrderStatus::Processing));

        let csv = view.export_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "2,Bob Smith,bob@test.com,Processing,299.99,2025-01-03"
        );
    }
}

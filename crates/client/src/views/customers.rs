//! Customer roster screen, derived from the order list.

use shopdesk_core::{Customer, Money, aggregate_customers, filter_customers, roster_revenue};

use crate::api::{ApiResult, DashboardApi};

pub struct CustomersView<'a, A: DashboardApi + ?Sized> {
    api: &'a A,
    roster: Vec<Customer>,
    search: String,
}

impl<'a, A: DashboardApi + ?Sized> CustomersView<'a, A> {
    pub const fn new(api: &'a A) -> Self {
        Self {
            api,
            roster: Vec::new(),
            search: String::new(),
        }
    }

    /// Fetch all orders and rebuild the roster from them.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous roster is kept.
    pub async fn load(&mut self) -> ApiResult<()> {
        let orders = self.api.list_orders().await?;
        self.roster = aggregate_customers(&orders);
        tracing::debug!(customers = self.roster.len(), orders = orders.len(), "Roster rebuilt");
        Ok(())
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn visible(&self) -> Vec<&Customer> {
        filter_customers(&self.roster, &self.search)
    }

    /// Revenue across the whole roster, ignoring the search box.
    pub fn revenue(&self) -> Money {
        roster_revenue(&self.roster)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fake::{FakeApi, order};
    use rust_decimal::Decimal;
    use shopdesk_core::OrderStatus;

    #[tokio::test]
    async fn test_roster_groups_orders_by_email() {
        let api = FakeApi::with_orders(vec![
            order(3, "Alice Smith", "ALICE@example.com", 2_000, OrderStatus::Delivered),
            order(2, "Bob", "bob@test.com", 500, OrderStatus::Pending),
            order(1, "Alice", "alice@example.com", 1_000, OrderStatus::Shipped),
        ]);
        let mut view = CustomersView::new(&api);
        view.load().await.unwrap();

        let rows = view.visible();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Alice Smith");
        assert_eq!(rows[0].total_orders, 2);
        assert_eq!(rows[0].total_spent, Decimal::new(3_000, 2));
        assert_eq!(view.revenue(), Decimal::new(3_500, 2));

        view.set_search("BOB");
        assert_eq!(view.visible().len(), 1);
        // Revenue covers the full roster.
        assert_eq!(view.revenue(), Decimal::new(3_500, 2));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_roster() {
        let api = FakeApi::with_orders(vec![order(
            1,
            "Bob",
            "bob@test.com",
            500,
            OrderStatus::Pending,
        )]);
        let mut view = CustomersView::new(&api);
        view.load().await.unwrap();

        api.state.lock().unwrap().fail_reads = true;
        assert!(view.load().await.is_err());
        assert_eq!(view.visible().len(), 1);
    }
}

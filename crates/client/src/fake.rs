//! In-process [`DashboardApi`] for view model tests.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use shopdesk_core::{
    AdminAccount, AdminId, Email, LineItemView, NewOrder, OrderId, OrderStatus, OrderView,
    Product, ProductId, ProductRef,
};

use crate::api::{ApiError, ApiResult, DashboardApi, ProductPage};

#[derive(Default)]
pub struct FakeState {
    pub products: Vec<Product>,
    pub orders: Vec<OrderView>,
    pub admins: Vec<AdminAccount>,
    /// Fail every mutating call with a server error.
    pub fail_writes: bool,
    /// Fail every read with a server error.
    pub fail_reads: bool,
    /// Every `(page, limit, query)` passed to `list_products`.
    pub product_queries: Vec<(u32, u32, String)>,
    pub created_orders: Vec<NewOrder>,
}

#[derive(Default)]
pub struct FakeApi {
    pub state: Mutex<FakeState>,
}

pub fn product(id: i32, name: &str, cents: i64) -> Product {
    let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        description: format!("{name} description"),
        price: Decimal::new(cents, 2),
        stock: 10,
        category: "Tools".to_owned(),
        images: vec![],
        created_at: at,
        updated_at: at,
    }
}

pub fn order(id: i32, name: &str, email: &str, cents: i64, status: OrderStatus) -> OrderView {
    let at = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap() + chrono::Duration::days(id.into());
    OrderView {
        id: OrderId::new(id),
        customer_name: name.to_owned(),
        customer_email: Email::parse(email).unwrap(),
        total: Decimal::new(cents, 2),
        status,
        items: vec![LineItemView {
            product: ProductRef {
                id: ProductId::new(1),
                name: "Widget".to_owned(),
                deleted: false,
            },
            quantity: 1,
            price: Decimal::new(cents, 2),
        }],
        created_at: at,
        updated_at: at,
    }
}

impl FakeApi {
    pub fn with_orders(orders: Vec<OrderView>) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().orders = orders;
        api
    }

    fn read_guard(&self) -> ApiResult<std::sync::MutexGuard<'_, FakeState>> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(ApiError::Server("Internal server error".to_owned()));
        }
        Ok(state)
    }

    fn write_guard(&self) -> ApiResult<std::sync::MutexGuard<'_, FakeState>> {
        let state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(ApiError::Server("Internal server error".to_owned()));
        }
        Ok(state)
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn list_products(&self, page: u32, limit: u32, query: &str) -> ApiResult<ProductPage> {
        let mut state = self.read_guard()?;
        state
            .product_queries
            .push((page, limit, query.to_owned()));

        let needle = query.to_lowercase();
        let matching: Vec<Product> = state
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let products = matching
            .into_iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .collect();

        Ok(ProductPage {
            products,
            total,
            total_pages: total.div_ceil(u64::from(limit)),
        })
    }

    async fn list_orders(&self) -> ApiResult<Vec<OrderView>> {
        Ok(self.read_guard()?.orders.clone())
    }

    async fn create_order(&self, request: &NewOrder) -> ApiResult<OrderView> {
        let mut state = self.write_guard()?;
        state.created_orders.push(request.clone());

        let id = i32::try_from(state.orders.len()).unwrap() + 100;
        let view = order(
            id,
            &request.customer_name,
            &request.customer_email,
            0,
            OrderStatus::Pending,
        );
        let view = OrderView {
            total: request.total.unwrap_or_default(),
            ..view
        };
        state.orders.insert(0, view.clone());
        Ok(view)
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> ApiResult<OrderView> {
        let mut state = self.write_guard()?;
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| ApiError::NotFound("Order not found".to_owned()))?;
        order.status = status;
        Ok(order.clone())
    }

    async fn delete_order(&self, id: OrderId) -> ApiResult<()> {
        let mut state = self.write_guard()?;
        let before = state.orders.len();
        state.orders.retain(|o| o.id != id);
        if state.orders.len() == before {
            return Err(ApiError::NotFound("Order not found".to_owned()));
        }
        Ok(())
    }

    async fn list_admins(&self) -> ApiResult<Vec<AdminAccount>> {
        Ok(self.read_guard()?.admins.clone())
    }

    async fn create_admin(&self, email: &str, _password: &str) -> ApiResult<AdminAccount> {
        let mut state = self.write_guard()?;
        let account = AdminAccount {
            id: AdminId::new(i32::try_from(state.admins.len()).unwrap() + 1),
            email: Email::parse(email).map_err(|e| ApiError::Validation(e.to_string()))?,
            created_at: Utc::now(),
        };
        state.admins.insert(0, account.clone());
        Ok(account)
    }
}

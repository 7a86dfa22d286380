//! Process-local [`Store`] implementation.
//!
//! Selected with `ADMIN_STORE=memory` and used by the router tests. All
//! collections sit behind one lock, so order creation (pricing, stock check,
//! insert, stock decrement) is atomic just like the `PostgreSQL` transaction.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use shopdesk_core::{
    AdminAccount, AdminId, Email, Order, OrderId, OrderStatus, PageRequest, Product, ProductId,
    ProductInput,
};

use super::orders::{CatalogEntry, price_draft};
use super::{AdminStore, OrderDraft, OrderStore, ProductStore, RepositoryError, Store};

#[derive(Debug, Default)]
struct MemoryState {
    products: Vec<Product>,
    orders: Vec<Order>,
    admins: Vec<(AdminAccount, String)>,
    next_product_id: i32,
    next_order_id: i32,
    next_admin_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

/// In-memory store. Cloning shares the underlying data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first, ties broken by id.
fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<Utc>, i32)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn as_count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn search_products(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<(Vec<Product>, u64), RepositoryError> {
        let needle = query.to_lowercase();
        let state = self.state.lock().await;

        let mut matches: Vec<Product> = state
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        newest_first(&mut matches, |p| (p.created_at, p.id.as_i32()));

        let total = as_count(matches.len());
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let slice = matches.into_iter().skip(offset).take(limit).collect();
        Ok((slice, total))
    }

    async fn all_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut products = self.state.lock().await.products.clone();
        newest_first(&mut products, |p| (p.created_at, p.id.as_i32()));
        Ok(products)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.products.iter().find(|p| p.id == id).cloned())
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(next_id(&mut state.next_product_id)),
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            stock: input.stock,
            category: input.category.clone(),
            images: input.images.clone(),
            created_at: now,
            updated_at: now,
        };
        state.products.push(product.clone());
        Ok(product)
    }

    async fn replace_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut state = self.state.lock().await;
        let Some(product) = state.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.name.clone_from(&input.name);
        product.description.clone_from(&input.description);
        product.price = input.price;
        product.stock = input.stock;
        product.category.clone_from(&input.category);
        product.images.clone_from(&input.images);
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        Ok(state.products.len() < before)
    }

    async fn count_products(&self) -> Result<u64, RepositoryError> {
        Ok(as_count(self.state.lock().await.products.len()))
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let mut orders = self.state.lock().await.orders.clone();
        newest_first(&mut orders, |o| (o.created_at, o.id.as_i32()));
        Ok(orders)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, RepositoryError> {
        let mut state = self.state.lock().await;

        let catalog: HashMap<ProductId, CatalogEntry> = state
            .products
            .iter()
            .map(|p| {
                (
                    p.id,
                    CatalogEntry {
                        name: p.name.clone(),
                        price: p.price,
                        stock: p.stock,
                    },
                )
            })
            .collect();
        let priced = price_draft(draft, &catalog)?;

        let now = Utc::now();
        for (id, quantity) in &priced.reservations {
            if let Some(product) = state.products.iter_mut().find(|p| p.id == *id) {
                product.stock -= quantity;
                product.updated_at = now;
            }
        }

        let order = Order {
            id: OrderId::new(next_id(&mut state.next_order_id)),
            customer_name: draft.customer_name.trim().to_owned(),
            customer_email: draft.customer_email.clone(),
            total: priced.total,
            status: draft.status,
            items: priced.items,
            created_at: now,
            updated_at: now,
        };
        state.orders.push(order.clone());
        Ok(order)
    }

    async fn set_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut state = self.state.lock().await;
        let Some(order) = state.orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        if order.status != status {
            order.status = status;
            order.updated_at = Utc::now();
        }
        Ok(Some(order.clone()))
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;
        let before = state.orders.len();
        state.orders.retain(|o| o.id != id);
        Ok(state.orders.len() < before)
    }

    async fn count_orders(&self) -> Result<u64, RepositoryError> {
        Ok(as_count(self.state.lock().await.orders.len()))
    }
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn list_admins(&self) -> Result<Vec<AdminAccount>, RepositoryError> {
        let mut admins: Vec<AdminAccount> = self
            .state
            .lock()
            .await
            .admins
            .iter()
            .map(|(account, _)| account.clone())
            .collect();
        newest_first(&mut admins, |a| (a.created_at, a.id.as_i32()));
        Ok(admins)
    }

    async fn find_admin_login(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminAccount, String)>, RepositoryError> {
        let key = email.identity_key();
        let state = self.state.lock().await;
        Ok(state
            .admins
            .iter()
            .find(|(account, _)| account.email.identity_key() == key)
            .cloned())
    }

    async fn get_admin(&self, id: AdminId) -> Result<Option<AdminAccount>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .admins
            .iter()
            .find(|(account, _)| account.id == id)
            .map(|(account, _)| account.clone()))
    }

    async fn create_admin(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<AdminAccount, RepositoryError> {
        let key = email.identity_key();
        let mut state = self.state.lock().await;
        if state
            .admins
            .iter()
            .any(|(account, _)| account.email.identity_key() == key)
        {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let account = AdminAccount {
            id: AdminId::new(next_id(&mut state.next_admin_id)),
            email: email.clone(),
            created_at: Utc::now(),
        };
        state
            .admins
            .push((account.clone(), password_hash.to_owned()));
        Ok(account)
    }

    async fn count_admins(&self) -> Result<u64, RepositoryError> {
        Ok(as_count(self.state.lock().await.admins.len()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shopdesk_core::NewLineItem;

    fn input(name: &str, stock: i32) -> ProductInput {
        ProductInput {
            name: name.to_owned(),
            description: "d".to_owned(),
            price: Decimal::new(999, 2),
            stock,
            category: "Tools".to_owned(),
            images: vec![],
        }
    }

    fn draft(product: ProductId, quantity: i32) -> OrderDraft {
        OrderDraft {
            customer_name: "Alice".to_owned(),
            customer_email: Email::parse("alice@example.com").unwrap(),
            status: OrderStatus::Pending,
            items: vec![NewLineItem { product, quantity }],
            reserve_stock: true,
        }
    }

    #[tokio::test]
    async fn test_search_pages_cover_every_match_once() {
        let store = MemoryStore::new();
        for i in 0..7 {
            store.create_product(&input(&format!("Widget {i}"), 1)).await.unwrap();
        }
        store.create_product(&input("Gadget", 1)).await.unwrap();

        let mut seen = Vec::new();
        for page in 1..=3 {
            let request = PageRequest::new(Some(page), Some(3)).unwrap();
            let (slice, total) = store.search_products("widget", request).await.unwrap();
            assert_eq!(total, 7);
            assert!(slice.len() <= 3);
            seen.extend(slice.into_iter().map(|p| p.id));
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 7);

        let beyond = PageRequest::new(Some(9), Some(3)).unwrap();
        let (slice, _) = store.search_products("widget", beyond).await.unwrap();
        assert!(slice.is_empty());
    }

    #[tokio::test]
    async fn test_search_keeps_surrounding_whitespace() {
        let store = MemoryStore::new();
        store.create_product(&input("Desk Lamp", 1)).await.unwrap();
        store.create_product(&input("Widget", 1)).await.unwrap();
        let request = PageRequest::new(None, None).unwrap();

        let (slice, total) = store.search_products(" lamp", request).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(slice[0].name, "Desk Lamp");

        let (_, total) = store.search_products(" widget", request).await.unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_create_order_reserves_stock() {
        let store = MemoryStore::new();
        let product = store.create_product(&input("Widget", 5)).await.unwrap();

        let order = store.create_order(&draft(product.id, 2)).await.unwrap();
        assert_eq!(order.total, Decimal::new(1998, 2));

        let after = store.get_product(product.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 3);

        let err = store.create_order(&draft(product.id, 4)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
        assert_eq!(store.count_orders().await.unwrap(), 1);

        // Deleting an order does not restock.
        assert!(store.delete_order(order.id).await.unwrap());
        let after = store.get_product(product.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 3);
    }

    #[tokio::test]
    async fn test_setting_same_status_changes_nothing() {
        let store = MemoryStore::new();
        let product = store.create_product(&input("Widget", 5)).await.unwrap();
        let order = store.create_order(&draft(product.id, 1)).await.unwrap();

        let same = store
            .set_order_status(order.id, OrderStatus::Pending)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(same, order);
    }

    #[tokio::test]
    async fn test_admin_email_unique_ignoring_case() {
        let store = MemoryStore::new();
        let email = Email::parse("Ops@Shop.test").unwrap();
        store.create_admin(&email, "hash").await.unwrap();

        let dup = Email::parse("ops@shop.test").unwrap();
        let err = store.create_admin(&dup, "hash").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let (account, hash) = store.find_admin_login(&dup).await.unwrap().unwrap();
        assert_eq!(account.email.as_str(), "Ops@Shop.test");
        assert_eq!(hash, "hash");
    }
}

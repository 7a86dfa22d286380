//! Dashboard tile statistics.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::orders::OrderView;
use crate::types::Money;

/// Products with fewer units than this count as low on stock.
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// Number of orders shown in the recent orders tile.
pub const RECENT_ORDERS: usize = 5;

/// Product count for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: u64,
}

/// Figures behind the dashboard home tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: Money,
    pub sales_count: u64,
    pub product_count: u64,
    pub low_stock_count: u64,
    /// Sorted by category name.
    pub categories: Vec<CategoryCount>,
    /// Newest first.
    pub recent_orders: Vec<OrderView>,
}

impl DashboardStats {
    #[must_use]
    pub fn compute(products: &[Product], orders: &[OrderView]) -> Self {
        let mut by_category: BTreeMap<&str, u64> = BTreeMap::new();
        for product in products {
            *by_category.entry(product.category.as_str()).or_default() += 1;
        }

        let mut recent: Vec<&OrderView> = orders.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Self {
            total_revenue: orders.iter().fold(Decimal::ZERO, |acc, o| acc + o.total),
            sales_count: orders.len() as u64,
            product_count: products.len() as u64,
            low_stock_count: products
                .iter()
                .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
                .count() as u64,
            categories: by_category
                .into_iter()
                .map(|(name, count)| CategoryCount {
                    name: name.to_owned(),
                    count,
                })
                .collect(),
            recent_orders: recent.into_iter().take(RECENT_ORDERS).cloned().collect(),
        }
    }
}

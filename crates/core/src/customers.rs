//! Customer roster derived from orders.
//!
//! Customers are not persisted. The roster is recomputed from the full order
//! list on every read so there is never a second source of truth.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::orders::OrderRecord;
use crate::types::Money;

/// One row of the customer roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Name from the first order seen for this email.
    pub name: String,
    /// Email as written on the first order seen.
    pub email: String,
    pub total_orders: u32,
    pub total_spent: Money,
    pub last_order_date: DateTime<Utc>,
}

/// Group orders by case-insensitive email.
///
/// The first order seen for an email supplies the displayed name and email;
/// differing names on later orders are not reconciled. Rows come out in
/// first-seen order. Single pass, `O(n)`.
#[must_use]
pub fn aggregate_customers<O: OrderRecord>(orders: &[O]) -> Vec<Customer> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut roster: Vec<Customer> = Vec::new();

    for order in orders {
        let key = order.customer_email().identity_key();
        match index.get(&key).copied() {
            Some(position) => {
                if let Some(customer) = roster.get_mut(position) {
                    customer.total_orders += 1;
                    customer.total_spent += order.total();
                    if order.created_at() > customer.last_order_date {
                        customer.last_order_date = order.created_at();
                    }
                }
            }
            None => {
                index.insert(key, roster.len());
                roster.push(Customer {
                    name: order.customer_name().to_owned(),
                    email: order.customer_email().as_str().to_owned(),
                    total_orders: 1,
                    total_spent: order.total(),
                    last_order_date: order.created_at(),
                });
            }
        }
    }

    roster
}

/// Roster search: name or email contains `query`, ignoring case.
#[must_use]
pub fn filter_customers<'a>(customers: &'a [Customer], query: &str) -> Vec<&'a Customer> {
    let needle = query.trim().to_lowercase();
    customers
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.name.to_lowercase().contains(&needle)
                || c.email.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Sum of `total_spent` over a roster.
#[must_use]
pub fn roster_revenue(customers: &[Customer]) -> Money {
    customers
        .iter()
        .fold(Decimal::ZERO, |acc, c| acc + c.total_spent)
}

//! Order records, product expansion and order-table filtering.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Email, MAX_AMOUNT, Money, OrderId, OrderStatus, ProductId, line_total};

/// Display name used for line items whose product no longer exists.
pub const DELETED_PRODUCT_NAME: &str = "Deleted Product";

/// A line item as persisted: product reference, quantity and frozen unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product: ProductId,
    pub quantity: i32,
    pub price: Money,
}

/// A persisted order.
///
/// `total` is a snapshot taken when the order was created; later catalog
/// price changes do not touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: Email,
    pub total: Money,
    pub status: OrderStatus,
    pub items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Expanded product reference inside an [`OrderView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: ProductId,
    pub name: String,
    /// True when the referenced product has been deleted from the catalog.
    #[serde(default)]
    pub deleted: bool,
}

impl ProductRef {
    /// Placeholder for a dangling reference.
    #[must_use]
    pub fn deleted(id: ProductId) -> Self {
        Self {
            id,
            name: DELETED_PRODUCT_NAME.to_owned(),
            deleted: true,
        }
    }
}

/// A line item with its product expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    pub product: ProductRef,
    pub quantity: i32,
    pub price: Money,
}

/// An order as returned by the API, with product references expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: Email,
    pub total: Money,
    pub status: OrderStatus,
    pub items: Vec<LineItemView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderView {
    /// Expand an order's product references against the catalog.
    ///
    /// References missing from `catalog` resolve to [`ProductRef::deleted`].
    #[must_use]
    pub fn expand(order: Order, catalog: &HashMap<ProductId, Product>) -> Self {
        let items = order
            .items
            .into_iter()
            .map(|item| LineItemView {
                product: catalog.get(&item.product).map_or_else(
                    || ProductRef::deleted(item.product),
                    |product| ProductRef {
                        id: product.id,
                        name: product.name.clone(),
                        deleted: false,
                    },
                ),
                quantity: item.quantity,
                price: item.price,
            })
            .collect();

        Self {
            id: order.id,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            total: order.total,
            status: order.status,
            items,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }

    /// Short, human-friendly reference: last six digits of the id, zero padded.
    #[must_use]
    pub fn short_id(&self) -> String {
        let id = self.id.to_string();
        let start = id.len().saturating_sub(6);
        format!("{:0>6}", id.get(start..).unwrap_or(&id))
    }

    /// Summary of the line items, e.g. `Mechanical Keyboard (x1), Deleted Product (x2)`.
    #[must_use]
    pub fn items_summary(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("{} (x{})", item.product.name, item.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Read access to the customer-facing fields shared by [`Order`] and [`OrderView`].
///
/// Lets the customer roster and dashboard tiles fold over either shape.
pub trait OrderRecord {
    fn customer_name(&self) -> &str;
    fn customer_email(&self) -> &Email;
    fn total(&self) -> Money;
    fn created_at(&self) -> DateTime<Utc>;
}

impl OrderRecord for Order {
    fn customer_name(&self) -> &str {
        &self.customer_name
    }

    fn customer_email(&self) -> &Email {
        &self.customer_email
    }

    fn total(&self) -> Money {
        self.total
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl OrderRecord for OrderView {
    fn customer_name(&self) -> &str {
        &self.customer_name
    }

    fn customer_email(&self) -> &Email {
        &self.customer_email
    }

    fn total(&self) -> Money {
        self.total
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Requested line item on order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLineItem {
    pub product: ProductId,
    pub quantity: i32,
}

/// Order creation request.
///
/// `total` is what the submitting client computed; the server recomputes it
/// from catalog prices and only uses this value to detect disagreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<NewLineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Money>,
}

/// Reasons a [`NewOrder`] is rejected before touching the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderValidationError {
    #[error("Customer name is required")]
    MissingCustomerName,
    #[error("Invalid customer email: {0}")]
    InvalidEmail(#[from] crate::types::EmailError),
    #[error("An order needs at least one item")]
    NoItems,
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
}

impl NewOrder {
    /// Check the request shape and parse the customer email.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<Email, OrderValidationError> {
        if self.customer_name.trim().is_empty() {
            return Err(OrderValidationError::MissingCustomerName);
        }
        let email = Email::parse(&self.customer_email)?;
        if self.items.is_empty() {
            return Err(OrderValidationError::NoItems);
        }
        if self.items.iter().any(|item| item.quantity < 1) {
            return Err(OrderValidationError::InvalidQuantity);
        }
        Ok(email)
    }
}

/// Sum of `price × quantity` over line items.
///
/// `None` when the sum, or any line of it, reaches [`MAX_AMOUNT`].
#[must_use]
pub fn line_items_total(items: &[LineItem]) -> Option<Money> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| {
            acc.checked_add(line_total(item.price, item.quantity)?)
        })
        .filter(|total| *total < MAX_AMOUNT)
}

/// Status filter of the order table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    /// Whether `status` passes this filter.
    #[must_use]
    pub fn matches(self, status: OrderStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }

    /// Parse a query-string value. Blank and `all` mean no filtering.
    ///
    /// # Errors
    ///
    /// Returns an error for anything that is neither `all` nor a status label.
    pub fn parse(value: Option<&str>) -> Result<Self, crate::types::ParseOrderStatusError> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::All),
            Some(v) if v.eq_ignore_ascii_case("all") => Ok(Self::All),
            Some(v) => v.parse().map(Self::Only),
        }
    }
}

/// Whether an order row matches a free-text search.
///
/// Matches customer name, customer email or order id, ignoring case.
/// A blank search matches everything.
#[must_use]
pub fn matches_search(order: &OrderView, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    order.customer_name.to_lowercase().contains(&needle)
        || order.customer_email.as_str().to_lowercase().contains(&needle)
        || order.id.to_string().contains(&needle)
}

/// Apply the search box and status filter of the order table.
#[must_use]
pub fn filter_orders<'a>(
    orders: &'a [OrderView],
    search: &str,
    status: StatusFilter,
) -> Vec<&'a OrderView> {
    orders
        .iter()
        .filter(|order| status.matches(order.status) && matches_search(order, search))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn order_view(
        id: i32,
        name: &str,
        email: &str,
        total: Money,
        status: OrderStatus,
    ) -> OrderView {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
            + chrono::Duration::days(i64::from(id));
        OrderView {
            id: OrderId::new(id),
            customer_name: name.to_owned(),
            customer_email: Email::parse(email).unwrap(),
            total,
            status,
            items: vec![],
            created_at: at,
            updated_at: at,
        }
    }

    fn product(id: i32, name: &str) -> Product {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: "d".to_owned(),
            price: Decimal::new(100, 0),
            stock: 1,
            category: "c".to_owned(),
            images: vec![],
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_expand_resolves_deleted_products() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let order = Order {
            id: OrderId::new(1),
            customer_name: "Alice".to_owned(),
            customer_email: Email::parse("alice@example.com").unwrap(),
            total: Decimal::new(300, 0),
            status: OrderStatus::Pending,
            items: vec![
                LineItem {
                    product: ProductId::new(1),
                    quantity: 1,
                    price: Decimal::new(100, 0),
                },
                LineItem {
                    product: ProductId::new(99),
                    quantity: 2,
                    price: Decimal::new(100, 0),
                },
            ],
            created_at: at,
            updated_at: at,
        };
        let catalog = HashMap::from([(ProductId::new(1), product(1, "Keyboard"))]);

        let view = OrderView::expand(order, &catalog);
        assert_eq!(view.items[0].product.name, "Keyboard");
        assert!(!view.items[0].product.deleted);
        assert_eq!(view.items[1].product, ProductRef::deleted(ProductId::new(99)));
        assert_eq!(view.items_summary(), "Keyboard (x1), Deleted Product (x2)");
    }

    #[test]
    fn test_line_items_total() {
        let items = vec![
            LineItem {
                product: ProductId::new(1),
                quantity: 3,
                price: Decimal::new(999, 2),
            },
            LineItem {
                product: ProductId::new(2),
                quantity: 1,
                price: Decimal::new(1, 2),
            },
        ];
        assert_eq!(line_items_total(&items), Some(Decimal::new(2998, 2)));
    }

    #[test]
    fn test_line_items_total_rejects_out_of_range_sums() {
        let line = |price: Decimal, quantity| LineItem {
            product: ProductId::new(1),
            quantity,
            price,
        };
        let huge = vec![line(Decimal::MAX, 2)];
        assert_eq!(line_items_total(&huge), None);

        let each_fits = vec![
            line(Decimal::new(6_000_000_000, 0), 1),
            line(Decimal::new(6_000_000_000, 0), 1),
        ];
        assert_eq!(line_items_total(&each_fits), None);
    }

    #[test]
    fn test_new_order_validation() {
        let mut order = NewOrder {
            customer_name: "Bob".to_owned(),
            customer_email: "bob@test.com".to_owned(),
            items: vec![NewLineItem {
                product: ProductId::new(1),
                quantity: 1,
            }],
            total: None,
        };
        assert_eq!(order.validate().unwrap().as_str(), "bob@test.com");

        order.items[0].quantity = 0;
        assert_eq!(order.validate(), Err(OrderValidationError::InvalidQuantity));

        order.items.clear();
        assert_eq!(order.validate(), Err(OrderValidationError::NoItems));

        order.customer_email = "bob".to_owned();
        assert!(matches!(
            order.validate(),
            Err(OrderValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!(StatusFilter::parse(None).unwrap(), StatusFilter::All);
        assert_eq!(StatusFilter::parse(Some("All")).unwrap(), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse(Some("shipped")).unwrap(),
            StatusFilter::Only(OrderStatus::Shipped)
        );
        assert!(StatusFilter::parse(Some("lost")).is_err());
    }

    #[test]
    fn test_filter_orders_combines_search_and_status() {
        let orders = vec![
            order_view(1, "Alice Johnson", "alice@example.com", Decimal::ONE, OrderStatus::Delivered),
            order_view(2, "Bob Smith", "bob@test.com", Decimal::ONE, OrderStatus::Processing),
            order_view(3, "Alicia Keys", "keys@gmail.com", Decimal::ONE, OrderStatus::Processing),
        ];

        let by_name: Vec<_> = filter_orders(&orders, "ALI", StatusFilter::All)
            .into_iter()
            .map(|o| o.id.as_i32())
            .collect();
        assert_eq!(by_name, vec![1, 3]);

        let narrowed: Vec<_> =
            filter_orders(&orders, "ali", StatusFilter::Only(OrderStatus::Processing))
                .into_iter()
                .map(|o| o.id.as_i32())
                .collect();
        assert_eq!(narrowed, vec![3]);

        let by_email = filter_orders(&orders, "test.com", StatusFilter::All);
        assert_eq!(by_email.len(), 1);
        assert_eq!(filter_orders(&orders, "  ", StatusFilter::All).len(), 3);
    }

    #[test]
    fn test_short_id_pads() {
        let view = order_view(42, "A", "a@x.com", Decimal::ONE, OrderStatus::Pending);
        assert_eq!(view.short_id(), "000042");
    }
}

//! CSV export of the order table.

use crate::orders::OrderView;
use crate::types::format_money;

/// Header row of the orders export.
pub const ORDERS_CSV_HEADER: &str = "Order ID,Customer,Email,Status,Total,Date";

/// Render order rows as CSV.
///
/// One header line, then one line per order: id, customer name, email,
/// status label, total with two decimals and the `YYYY-MM-DD` creation date.
/// Fields are joined with commas and not quoted, so values containing commas
/// shift the columns of their row.
#[must_use]
pub fn orders_csv(orders: &[&OrderView]) -> String {
    let mut lines = Vec::with_capacity(orders.len() + 1);
    lines.push(ORDERS_CSV_HEADER.to_owned());
    lines.extend(orders.iter().map(|order| {
        [
            order.id.to_string(),
            order.customer_name.clone(),
            order.customer_email.to_string(),
            order.status.to_string(),
            format_money(order.total),
            order.created_at.format("%Y-%m-%d").to_string(),
        ]
        .join(",")
    }));
    lines.join("\n")
}

/// File name for an export taken on `date`, e.g. `orders-2025-01-31.csv`.
#[must_use]
pub fn export_file_name(date: chrono::NaiveDate) -> String {
    format!("orders-{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::orders::tests::order_view;
    use crate::types::OrderStatus;
    use rust_decimal::Decimal;

    #[test]
    fn test_orders_csv_rows() {
        let orders = [
            order_view(7, "Alice", "alice@example.com", Decimal::new(1299, 1), OrderStatus::Shipped),
            order_view(8, "Bob", "bob@test.com", Decimal::new(5, 0), OrderStatus::Pending),
        ];
        let rows: Vec<&OrderView> = orders.iter().collect();

        let csv = orders_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], ORDERS_CSV_HEADER);
        assert_eq!(lines[1], "7,Alice,alice@example.com,Shipped,129.90,2025-01-08");
        assert_eq!(lines[2], "8,Bob,bob@test.com,Pending,5.00,2025-01-09");
        assert!(lines.iter().all(|line| line.split(',').count() == 6));
    }

    #[test]
    fn test_empty_export_has_header_only() {
        assert_eq!(orders_csv(&[]), ORDERS_CSV_HEADER);
    }

    #[test]
    fn test_export_file_name() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(export_file_name(date), "orders-2025-01-31.csv");
    }
}

//! Currency amounts.
//!
//! Amounts are plain decimals in the store currency's standard unit
//! (dollars, not cents). Serialized as strings to avoid float drift; JSON
//! numbers are accepted on input.

use rust_decimal::Decimal;

/// A currency amount.
pub type Money = Decimal;

/// Decimal places a stored amount may carry.
pub const MONEY_SCALE: u32 = 2;

/// Exclusive upper bound of a stored amount (`NUMERIC(12, 2)`).
pub const MAX_AMOUNT: Money = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// `price × quantity`, or `None` when the result reaches [`MAX_AMOUNT`].
#[must_use]
pub fn line_total(price: Money, quantity: i32) -> Option<Money> {
    price
        .checked_mul(Decimal::from(quantity))
        .filter(|total| *total < MAX_AMOUNT)
}

/// Format an amount with exactly two decimal places (`219.98`, `5.00`).
#[must_use]
pub fn format_money(amount: Money) -> String {
    format!("{:.2}", amount.round_dp(2))
}

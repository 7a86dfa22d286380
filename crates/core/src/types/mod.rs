//! Core types for Shopdesk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{MAX_AMOUNT, MONEY_SCALE, Money, format_money, line_total};
pub use status::{OrderStatus, ParseOrderStatusError};

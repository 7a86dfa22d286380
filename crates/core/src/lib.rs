//! Shopdesk Core - Shared domain library.
//!
//! This crate provides the types and pure logic used across all Shopdesk components:
//! - `admin` - JSON API server for the administration dashboard
//! - `client` - Typed API client and dashboard view models
//! - `cli` - Command-line tools for migrations, seeding and admin accounts
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Anything that derives a view from records (customer
//! roster, filtered order table, CSV export, dashboard tiles) lives here so the
//! server and the client compute it identically.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, money and statuses
//! - [`accounts`] - Administrator account records
//! - [`catalog`] - Product records and input validation
//! - [`orders`] - Order records, product expansion and table filtering
//! - [`customers`] - Customer roster aggregation over orders
//! - [`export`] - CSV export of order rows
//! - [`envelope`] - `{success, data, error}` response wrapper and pagination
//! - [`stats`] - Dashboard tile statistics

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod accounts;
pub mod catalog;
pub mod customers;
pub mod envelope;
pub mod export;
pub mod orders;
pub mod stats;
pub mod types;

pub use accounts::AdminAccount;
pub use catalog::{Product, ProductInput, ProductValidationError};
pub use customers::{Customer, aggregate_customers, filter_customers, roster_revenue};
pub use envelope::{ApiResponse, PageRequest, PageRequestError, Pagination};
pub use export::orders_csv;
pub use orders::{
    LineItem, LineItemView, NewLineItem, NewOrder, Order, OrderRecord, OrderValidationError,
    OrderView, ProductRef, StatusFilter, filter_orders,
};
pub use stats::{CategoryCount, DashboardStats};
pub use types::*;

//! Shopdesk dashboard client.
//!
//! A typed client for the admin JSON API and the view models behind the
//! dashboard screens. Views talk to the server only through
//! [`DashboardApi`], so they run against [`HttpApi`] in production and an
//! in-process fake in tests.
//!
//! # Modules
//!
//! - [`api`] - The `DashboardApi` trait and its error type
//! - [`http`] - `reqwest` implementation with a cookie session
//! - [`debounce`] - Settling of rapidly changing input
//! - [`views`] - Orders, products, customers and admins screens

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod debounce;
pub mod http;
pub mod views;

#[cfg(test)]
mod fake;

pub use api::{ApiError, ApiResult, DashboardApi, ProductPage};
pub use debounce::Debounced;
pub use http::HttpApi;

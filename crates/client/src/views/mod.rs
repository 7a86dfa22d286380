//! View models for the dashboard screens.
//!
//! Each view borrows a [`DashboardApi`](crate::DashboardApi) and keeps the
//! state of one screen: fetched rows, filter inputs and URL state.

pub mod admins;
pub mod customers;
pub mod orders;
pub mod products;

pub use admins::AdminsView;
pub use customers::CustomersView;
pub use orders::{CustomerDetails, OrdersView, PendingChange};
pub use products::{HistoryUpdate, ListingUrl, ProductsView};

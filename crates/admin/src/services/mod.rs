//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Password login and admin onboarding
//! - `orders` - Order placement with catalog pricing and stock reservation
//! - `seed` - Idempotent demo data

pub mod auth;
pub mod orders;
pub mod seed;

pub use auth::{AdminAuthError, AdminAuthService};
pub use orders::{OrderService, OrderServiceError};
pub use seed::{SeedError, SeedReport, seed};

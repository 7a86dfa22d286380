//! The API surface the dashboard views depend on.

use async_trait::async_trait;
use thiserror::Error;

use shopdesk_core::{AdminAccount, NewOrder, OrderId, OrderStatus, OrderView, Product};

/// Client error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL or endpoint could not be built
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected input, with the server's message
    #[error("{0}")]
    Validation(String),

    /// Server-side failure
    #[error("Server error: {0}")]
    Server(String),
}

/// Result type for client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// One page of the product listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
    pub total_pages: u64,
}

/// Admin JSON API as seen by the dashboard.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Products whose name contains `query`, newest first.
    async fn list_products(&self, page: u32, limit: u32, query: &str) -> ApiResult<ProductPage>;

    /// Every order, newest first, products expanded.
    async fn list_orders(&self) -> ApiResult<Vec<OrderView>>;

    async fn create_order(&self, order: &NewOrder) -> ApiResult<OrderView>;

    async fn update_order_status(&self, id: OrderId, status: OrderStatus)
    -> ApiResult<OrderView>;

    async fn delete_order(&self, id: OrderId) -> ApiResult<()>;

    async fn list_admins(&self) -> ApiResult<Vec<AdminAccount>>;

    async fn create_admin(&self, email: &str, password: &str) -> ApiResult<AdminAccount>;
}

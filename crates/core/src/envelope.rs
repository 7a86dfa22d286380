//! Response envelope and pagination shared by every API endpoint.

use serde::{Deserialize, Serialize};

/// The `{success, data?, error?}` wrapper around every API response.
///
/// Paginated listings additionally carry a `pagination` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            pagination: None,
        }
    }

    /// A successful page of results.
    #[must_use]
    pub const fn page(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            pagination: Some(pagination),
        }
    }

    /// A failed response with a flat message.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            pagination: None,
        }
    }

    /// Convert into a `Result`, treating `success: false` or a missing
    /// payload as an error message.
    ///
    /// # Errors
    ///
    /// Returns the server's error message, or a generic one when none was sent.
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err("response carried no data".to_owned()),
            (false, _) => Err(self
                .error
                .unwrap_or_else(|| "request failed".to_owned())),
        }
    }
}

/// Pagination block of a listing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl Pagination {
    /// Build the block for `total` matches under `request`.
    ///
    /// `total_pages` is `ceil(total / limit)`, so an empty result has zero pages.
    #[must_use]
    pub const fn new(total: u64, request: PageRequest) -> Self {
        Self {
            total,
            page: request.page,
            limit: request.limit,
            total_pages: total.div_ceil(request.limit as u64),
        }
    }
}

/// A validated `(page, limit)` pair. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

/// Reasons a page request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    #[error("page must be at least 1")]
    InvalidPage,
    #[error("limit must be at least 1")]
    InvalidLimit,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;
    /// Larger limits are clamped to this.
    pub const MAX_LIMIT: u32 = 100;

    /// Validate a page request, filling in defaults for missing values.
    ///
    /// # Errors
    ///
    /// Returns an error when `page` or `limit` is below 1.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, PageRequestError> {
        let page = page.unwrap_or(i64::from(Self::DEFAULT_PAGE));
        let limit = limit.unwrap_or(i64::from(Self::DEFAULT_LIMIT));
        if page < 1 {
            return Err(PageRequestError::InvalidPage);
        }
        if limit < 1 {
            return Err(PageRequestError::InvalidLimit);
        }
        Ok(Self {
            page: u32::try_from(page).unwrap_or(u32::MAX),
            limit: u32::try_from(limit)
                .unwrap_or(u32::MAX)
                .min(Self::MAX_LIMIT),
        })
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records before this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = PageRequest::new(None, None).unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert_eq!(
            PageRequest::new(Some(0), None),
            Err(PageRequestError::InvalidPage)
        );
        assert_eq!(
            PageRequest::new(Some(1), Some(-5)),
            Err(PageRequestError::InvalidLimit)
        );
    }

    #[test]
    fn test_limit_is_clamped() {
        let request = PageRequest::new(Some(3), Some(10_000)).unwrap();
        assert_eq!(request.limit(), PageRequest::MAX_LIMIT);
        assert_eq!(request.offset(), 200);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let request = PageRequest::new(Some(1), Some(5)).unwrap();
        assert_eq!(Pagination::new(0, request).total_pages, 0);
        assert_eq!(Pagination::new(5, request).total_pages, 1);
        assert_eq!(Pagination::new(6, request).total_pages, 2);
    }

    #[test]
    fn test_envelope_omits_empty_fields() {
        let json = serde_json::to_value(ApiResponse::<()>::failure("Product not found")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Product not found"})
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ApiResponse::ok(3).into_result(), Ok(3));
        assert_eq!(
            ApiResponse::<i32>::failure("nope").into_result(),
            Err("nope".to_owned())
        );
    }
}

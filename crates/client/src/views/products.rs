//! Product listing with URL-synced paging and debounced search.

use std::time::Duration;

use url::form_urlencoded;

use shopdesk_core::Product;

use crate::api::DashboardApi;
use crate::debounce::Debounced;

/// Rows per listing page.
pub const PAGE_SIZE: u32 = 5;

/// Quiet period before typed search text is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Listing state carried in the page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingUrl {
    pub page: u32,
    pub query: String,
}

impl Default for ListingUrl {
    fn default() -> Self {
        Self {
            page: 1,
            query: String::new(),
        }
    }
}

impl ListingUrl {
    /// Read `page` and `query` from a query string, with or without the
    /// leading `?`. Missing or unusable values fall back to page 1 and an
    /// empty query.
    #[must_use]
    pub fn parse(query_string: &str) -> Self {
        let mut url = Self::default();
        let raw = query_string.strip_prefix('?').unwrap_or(query_string);

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "page" => {
                    url.page = value.parse().ok().filter(|p| *p >= 1).unwrap_or(1);
                }
                "query" => url.query = value.into_owned(),
                _ => {}
            }
        }
        url
    }

    /// Render as `page=2&query=widg`; an empty query is left out.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        out.append_pair("page", &self.page.to_string());
        if !self.query.is_empty() {
            out.append_pair("query", &self.query);
        }
        out.finish()
    }
}

/// How the caller should record a URL change in browser history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryUpdate {
    /// New history entry (page navigation).
    Push(String),
    /// Overwrite the current entry (search refinement).
    Replace(String),
}

pub struct ProductsView<'a, A: DashboardApi + ?Sized> {
    api: &'a A,
    url: ListingUrl,
    input: String,
    search: Debounced<String>,
    products: Vec<Product>,
    total_pages: u64,
}

impl<'a, A: DashboardApi + ?Sized> ProductsView<'a, A> {
    /// Start from the query string of the current location.
    pub fn new(api: &'a A, location_query: &str) -> Self {
        let url = ListingUrl::parse(location_query);
        Self {
            api,
            input: url.query.clone(),
            url,
            search: Debounced::new(SEARCH_DEBOUNCE),
            products: Vec::new(),
            total_pages: 0,
        }
    }

    pub const fn url(&self) -> &ListingUrl {
        &self.url
    }

    /// Text currently in the search box, applied or not.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Record a keystroke. Nothing is applied until typing pauses.
    pub fn type_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.input.clone_from(&text);
        self.search.push(text);
    }

    /// Apply the typed query if its quiet period has already passed.
    pub fn poll_search(&mut self) -> Option<HistoryUpdate> {
        let query = self.search.take_ready()?;
        Some(self.apply_query(query))
    }

    /// Wait for typing to pause, then apply the query.
    ///
    /// Returns `None` when nothing was typed.
    pub async fn settle_search(&mut self) -> Option<HistoryUpdate> {
        let query = self.search.settled().await?;
        Some(self.apply_query(query))
    }

    fn apply_query(&mut self, query: String) -> HistoryUpdate {
        self.url.query = query;
        self.url.page = 1;
        HistoryUpdate::Replace(self.url.to_query_string())
    }

    /// Move to another page. Pages below 1 are treated as 1.
    pub fn set_page(&mut self, page: u32) -> HistoryUpdate {
        self.url.page = page.max(1);
        HistoryUpdate::Push(self.url.to_query_string())
    }

    /// Load the rows for the current URL state. On failure the previous rows
    /// stay on screen.
    pub async fn fetch(&mut self) {
        match self
            .api
            .list_products(self.url.page, PAGE_SIZE, &self.url.query)
            .await
        {
            Ok(page) => {
                self.products = page.products;
                self.total_pages = page.total_pages;
            }
            Err(e) => {
                tracing::error!(error = %e, page = self.url.page, "Failed to fetch products");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fake::{FakeApi, product};

    fn catalog() -> FakeApi {
        let api = FakeApi::default();
        {
            let mut state = api.state.lock().unwrap();
            state.products = (1..=7)
                .map(|i| product(i, &format!("Lamp {i}"), 1_000))
                .chain([product(8, "Widget", 999), product(9, "Gizmo", 1_999)])
                .collect();
        }
        api
    }

    #[test]
    fn test_url_round_trips_through_query_string() {
        let url = ListingUrl::parse("?page=2&query=widg");
        assert_eq!(url.page, 2);
        assert_eq!(url.query, "widg");
        assert_eq!(url.to_query_string(), "page=2&query=widg");
    }

    #[test]
    fn test_url_defaults_and_omits_empty_query() {
        assert_eq!(ListingUrl::parse(""), ListingUrl::default());
        assert_eq!(ListingUrl::parse("page=0&query=").page, 1);
        assert_eq!(ListingUrl::parse("page=abc").page, 1);
        assert_eq!(ListingUrl::default().to_query_string(), "page=1");
    }

    #[test]
    fn test_url_encodes_query() {
        let url = ListingUrl {
            page: 1,
            query: "desk lamp".to_owned(),
        };
        assert_eq!(url.to_query_string(), "page=1&query=desk+lamp");
        assert_eq!(ListingUrl::parse(&url.to_query_string()), url);
    }

    #[tokio::test]
    async fn test_page_change_pushes_history() {
        let api = catalog();
        let mut view = ProductsView::new(&api, "");
        assert_eq!(
            view.set_page(2),
            HistoryUpdate::Push("page=2".to_owned())
        );
        view.fetch().await;

        assert_eq!(view.products().len(), 4);
        assert_eq!(view.total_pages(), 2);
        assert_eq!(
            api.state.lock().unwrap().product_queries,
            vec![(2, PAGE_SIZE, String::new())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_waits_for_typing_to_pause() {
        let api = catalog();
        let mut view = ProductsView::new(&api, "page=2");

        view.type_query("w");
        tokio::time::advance(Duration::from_millis(200)).await;
        view.type_query("wid");
        assert_eq!(view.poll_search(), None);
        assert_eq!(view.input(), "wid");
        assert_eq!(view.url().query, "");

        tokio::time::advance(Duration::from_millis(499)).await;
        assert_eq!(view.poll_search(), None);
        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(
            view.poll_search(),
            Some(HistoryUpdate::Replace("page=1&query=wid".to_owned()))
        );

        view.fetch().await;
        assert_eq!(view.products().len(), 1);
        assert_eq!(view.products()[0].name, "Widget");
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_search_applies_last_keystroke() {
        let api = catalog();
        let mut view = ProductsView::new(&api, "");
        assert_eq!(view.settle_search().await, None);

        view.type_query("g");
        view.type_query("giz");
        assert_eq!(
            view.settle_search().await,
            Some(HistoryUpdate::Replace("page=1&query=giz".to_owned()))
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_rows() {
        let api = catalog();
        let mut view = ProductsView::new(&api, "");
        view.fetch().await;
        assert_eq!(view.products().len(), PAGE_SIZE as usize);

        api.state.lock().unwrap().fail_reads = true;
        view.set_page(2);
        view.fetch().await;
        assert_eq!(view.products().len(), PAGE_SIZE as usize);
        assert_eq!(view.products()[0].name, "Lamp 1");
        assert_eq!(view.total_pages(), 2);
    }
}

//! HTTP implementation of [`DashboardApi`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use shopdesk_core::{AdminAccount, ApiResponse, NewOrder, OrderId, OrderStatus, OrderView, Product};

use crate::api::{ApiError, ApiResult, DashboardApi, ProductPage};

/// Client for the admin API. The session cookie from [`HttpApi::login`] is
/// kept in the client's cookie store and sent with every request.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct StatusPatch {
    status: OrderStatus,
}

impl HttpApi {
    /// Create a client for the API at `base_url`, e.g. `http://localhost:3001`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or the client cannot be built.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Sign in; later requests carry the session cookie.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for wrong credentials.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<()> {
        let resp = self
            .client
            .post(self.endpoint("/api/auth/login")?)
            .json(&Credentials { email, password })
            .send()
            .await?;
        Self::check(resp).await.map(drop)
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn logout(&self) -> ApiResult<()> {
        let resp = self
            .client
            .post(self.endpoint("/api/auth/logout")?)
            .send()
            .await?;
        Self::check(resp).await.map(drop)
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Turn a non-2xx response into an error carrying the envelope's message.
    async fn check(resp: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or(text);

        Err(match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::BAD_REQUEST => ApiError::Validation(message),
            _ => ApiError::Server(message),
        })
    }

    async fn envelope<T: DeserializeOwned>(resp: reqwest::Response) -> ApiResult<ApiResponse<T>> {
        let resp = Self::check(resp).await?;
        resp.json().await.map_err(Into::into)
    }

    async fn data<T: DeserializeOwned>(resp: reqwest::Response) -> ApiResult<T> {
        Self::envelope(resp)
            .await?
            .into_result()
            .map_err(ApiError::InvalidResponse)
    }
}

#[async_trait]
impl DashboardApi for HttpApi {
    async fn list_products(&self, page: u32, limit: u32, query: &str) -> ApiResult<ProductPage> {
        let mut url = self.endpoint("/api/products")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("page", &page.to_string())
                .append_pair("limit", &limit.to_string());
            if !query.is_empty() {
                pairs.append_pair("query", query);
            }
        }

        let envelope: ApiResponse<Vec<Product>> =
            Self::envelope(self.client.get(url).send().await?).await?;
        let pagination = envelope
            .pagination
            .ok_or_else(|| ApiError::InvalidResponse("Missing pagination".into()))?;
        let products = envelope
            .into_result()
            .map_err(ApiError::InvalidResponse)?;

        Ok(ProductPage {
            products,
            total: pagination.total,
            total_pages: pagination.total_pages,
        })
    }

    async fn list_orders(&self) -> ApiResult<Vec<OrderView>> {
        let resp = self.client.get(self.endpoint("/api/orders")?).send().await?;
        Self::data(resp).await
    }

    async fn create_order(&self, order: &NewOrder) -> ApiResult<OrderView> {
        let resp = self
            .client
            .post(self.endpoint("/api/orders")?)
            .json(order)
            .send()
            .await?;
        Self::data(resp).await
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> ApiResult<OrderView> {
        let resp = self
            .client
            .patch(self.endpoint(&format!("/api/orders/{id}"))?)
            .json(&StatusPatch { status })
            .send()
            .await?;
        Self::data(resp).await
    }

    async fn delete_order(&self, id: OrderId) -> ApiResult<()> {
        let resp = self
            .client
            .delete(self.endpoint(&format!("/api/orders/{id}"))?)
            .send()
            .await?;
        Self::check(resp).await.map(drop)
    }

    async fn list_admins(&self) -> ApiResult<Vec<AdminAccount>> {
        let resp = self.client.get(self.endpoint("/api/admins")?).send().await?;
        Self::data(resp).await
    }

    async fn create_admin(&self, email: &str, password: &str) -> ApiResult<AdminAccount> {
        let resp = self
            .client
            .post(self.endpoint("/api/admins")?)
            .json(&Credentials { email, password })
            .send()
            .await?;
        Self::data(resp).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_resolve_against_base() {
        let api = HttpApi::new("http://localhost:3001").unwrap();
        assert_eq!(
            api.endpoint("/api/orders/7").unwrap().as_str(),
            "http://localhost:3001/api/orders/7"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(HttpApi::new("not a url"), Err(ApiError::Url(_))));
    }
}

//! HTTP client for the storefront backend (stock + catalog).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use rocketcart_cart::{LookupError, ProductCatalog, ProductDetails, StockLevel, StockLookup};
use rocketcart_core::ProductId;

/// Client for the storefront REST API.
///
/// - `GET {base}/stock/{id}` → `{ "id", "amount" }`
/// - `GET {base}/products/{id}` → `{ "id", "title", "price", "image" }`
#[derive(Debug, Clone)]
pub struct HttpStorefrontClient {
    client: reqwest::Client,
    api_url: String,
}

impl HttpStorefrontClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn get_json<T>(&self, path: &str, product_id: ProductId) -> Result<T, LookupError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}/{}", self.api_url, path, product_id);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(product_id));
        }
        if !status.is_success() {
            return Err(LookupError::Api(
                status.as_u16(),
                resp.text().await.unwrap_or_default(),
            ));
        }

        resp.json().await.map_err(|e| LookupError::Parse(e.to_string()))
    }
}

#[async_trait]
impl StockLookup for HttpStorefrontClient {
    async fn stock(&self, product_id: ProductId) -> Result<StockLevel, LookupError> {
        let stock: StockLevel = self.get_json("stock", product_id).await?;
        tracing::debug!(product_id = %product_id, amount = stock.amount, "fetched stock level");
        Ok(stock)
    }
}

#[async_trait]
impl ProductCatalog for HttpStorefrontClient {
    async fn product(&self, product_id: ProductId) -> Result<ProductDetails, LookupError> {
        self.get_json("products", product_id).await
    }
}

//! HTTP catalog client (reqwest-based).
//!
//! Talks to the storefront's admin REST API. Option and image replacement is
//! wired as an explicit remove-then-recreate pair because the backend's
//! in-place rename and reorder endpoints do not converge reliably.

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use async_trait::async_trait;

use super::{CatalogApi, Metafield, ProductDraft, ProductFields, RemoteProduct};
use crate::error::{CatalogError, CatalogResult};

/// Configuration for [`RestCatalog`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestCatalogConfig {
    /// Base URL of the admin API (e.g. `https://shop.example.com/admin`).
    pub base_url: String,
    /// Bearer token for the admin API.
    pub api_token: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Page size for product listing.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    50
}

impl RestCatalogConfig {
    pub fn validate(&self) -> CatalogResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(CatalogError::InvalidConfig("base_url is empty".into()));
        }
        if self.api_token.trim().is_empty() {
            return Err(CatalogError::InvalidConfig("api_token is empty".into()));
        }
        Ok(())
    }
}

/// REST client for the storefront catalog.
#[derive(Debug, Clone)]
pub struct RestCatalog {
    base_url: String,
    api_token: String,
    page_size: u32,
    http_client: Client,
}

#[derive(Debug, Deserialize)]
struct CreatedProduct {
    id: String,
}

#[derive(Debug, Serialize)]
struct OptionEntry<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct VariantPayload<'a> {
    sku: &'a str,
    price: &'a str,
    options: Vec<OptionEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct ImagesPayload<'a> {
    images: &'a [String],
}

#[derive(Debug, Serialize)]
struct MetafieldsPayload<'a> {
    metafields: &'a [Metafield],
}

#[derive(Debug, Serialize)]
struct InventoryPayload {
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct ProductsPage {
    products: Vec<RemoteProduct>,
}

impl RestCatalog {
    /// Create a new catalog client from configuration.
    pub fn new(config: &RestCatalogConfig) -> CatalogResult<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("vitrine-sync/1.0")
            .build()
            .map_err(|e| {
                CatalogError::InvalidConfig(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            page_size: config.page_size,
            http_client,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(base_url: String, api_token: String, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
            page_size: default_page_size(),
            http_client,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Internal HTTP Methods ─────────────────────────────────────────

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> CatalogResult<T> {
        debug!("catalog POST {}", url);
        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn post_no_content<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> CatalogResult<()> {
        debug!("catalog POST {}", url);
        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await?;
        self.expect_success(response).await
    }

    async fn put<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> CatalogResult<()> {
        debug!("catalog PUT {}", url);
        let response = self
            .http_client
            .put(url)
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await?;
        self.expect_success(response).await
    }

    /// DELETE where a 404 means the resource is already gone.
    async fn delete_absent_ok(&self, url: &str) -> CatalogResult<()> {
        debug!("catalog DELETE {}", url);
        let response = self
            .http_client
            .delete(url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        self.handle_error_response(response).await
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> CatalogResult<T> {
        debug!("catalog GET {}", url);
        let response = self
            .http_client
            .get(url)
            .query(query)
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        self.handle_response(response).await
    }

    // ── Response Handling ─────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> CatalogResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| CatalogError::Parse(format!("Failed to parse response: {e}")))
        } else {
            self.handle_error_response(response).await
        }
    }

    async fn expect_success(&self, response: reqwest::Response) -> CatalogResult<()> {
        let status = response.status();
        if status == StatusCode::NO_CONTENT || status.is_success() {
            Ok(())
        } else {
            self.handle_error_response(response).await
        }
    }

    async fn handle_error_response<T>(&self, response: reqwest::Response) -> CatalogResult<T> {
        let status = response.status();

        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());

        match status {
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound(body)),
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("catalog rate limited, retry after {:?}s", retry_after);
                Err(CatalogError::RateLimited {
                    retry_after_secs: retry_after,
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(CatalogError::Auth(format!(
                "Authentication failed ({}): {body}",
                status.as_u16()
            ))),
            _ => {
                let detail = if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                };
                Err(CatalogError::Api {
                    status: status.as_u16(),
                    detail,
                })
            }
        }
    }
}

#[async_trait]
impl CatalogApi for RestCatalog {
    async fn create_product(&self, draft: &ProductDraft) -> CatalogResult<String> {
        let url = format!("{}/products", self.base_url);
        let created: CreatedProduct = self.post(&url, draft).await?;
        if created.id.is_empty() {
            return Err(CatalogError::Structural(
                "create response carried an empty product id".into(),
            ));
        }
        Ok(created.id)
    }

    async fn update_product(&self, product_id: &str, fields: &ProductFields) -> CatalogResult<()> {
        let url = format!("{}/products/{}", self.base_url, product_id);
        self.put(&url, fields).await
    }

    async fn delete_product(&self, product_id: &str) -> CatalogResult<()> {
        let url = format!("{}/products/{}", self.base_url, product_id);
        self.delete_absent_ok(&url).await
    }

    async fn replace_options_and_variant(
        &self,
        product_id: &str,
        sku: &str,
        price: &str,
        options: &[(String, String)],
    ) -> CatalogResult<()> {
        // Remove first, then recreate. In-place edits are deliberately avoided.
        let url = format!("{}/products/{}/options", self.base_url, product_id);
        self.delete_absent_ok(&url).await?;

        let payload = VariantPayload {
            sku,
            price,
            options: options
                .iter()
                .map(|(name, value)| OptionEntry { name, value })
                .collect(),
        };
        self.post_no_content(&url, &payload).await
    }

    async fn replace_images(&self, product_id: &str, images: &[String]) -> CatalogResult<()> {
        let url = format!("{}/products/{}/images", self.base_url, product_id);
        self.delete_absent_ok(&url).await?;
        self.post_no_content(&url, &ImagesPayload { images }).await
    }

    async fn upsert_metafields(
        &self,
        product_id: &str,
        metafields: &[Metafield],
    ) -> CatalogResult<()> {
        if metafields.is_empty() {
            return Ok(());
        }
        let url = format!("{}/products/{}/metafields", self.base_url, product_id);
        self.post_no_content(&url, &MetafieldsPayload { metafields })
            .await
    }

    async fn set_inventory_absolute(&self, product_id: &str, quantity: u32) -> CatalogResult<()> {
        let url = format!("{}/products/{}/inventory", self.base_url, product_id);
        self.put(&url, &InventoryPayload { quantity }).await
    }

    async fn list_products(&self) -> CatalogResult<Vec<RemoteProduct>> {
        let url = format!("{}/products", self.base_url);
        let mut all = Vec::new();
        let mut page: u32 = 1;

        loop {
            let query = [
                ("page", page.to_string()),
                ("per_page", self.page_size.to_string()),
            ];
            let batch: ProductsPage = self.get(&url, &query).await?;
            let count = batch.products.len();
            all.extend(batch.products);

            if count < self.page_size as usize {
                break;
            }
            page += 1;
        }

        Ok(all)
    }
}

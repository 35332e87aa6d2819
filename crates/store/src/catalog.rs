//! Catalog service client for product and stock lookups.
//!
//! A REST client over `reqwest`. Product records are cached using `moka`
//! (5-minute TTL) since catalog data is slow-moving; stock is never cached
//! and is read fresh on every mutating cart operation.

use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use basket_core::{Product, ProductId, StockRecord};

use crate::config::CatalogConfig;

const PRODUCT_CACHE_CAPACITY: u64 = 1000;
const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Errors that can occur when interacting with the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured access token is not a valid header value.
    #[error("Invalid access token: {0}")]
    InvalidToken(String),
}

/// Client for the product/stock catalog service.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the product
/// cache.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    products: Cache<ProductId, Product>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the access
    /// token cannot be used as a header value.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.access_token {
            let mut value =
                HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                    .map_err(|e| CatalogError::InvalidToken(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let products = Cache::builder()
            .max_capacity(PRODUCT_CACHE_CAPACITY)
            .time_to_live(PRODUCT_CACHE_TTL)
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            products,
        })
    }

    /// Get the current available stock for a product. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is unknown to the catalog or the
    /// request fails.
    #[instrument(skip(self))]
    pub async fn get_stock(&self, product_id: ProductId) -> Result<StockRecord, CatalogError> {
        self.fetch(&format!("stock/{product_id}")).await
    }

    /// Get a full product record.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is unknown to the catalog or the
    /// request fails.
    #[instrument(skip(self))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, CatalogError> {
        // Check cache
        if let Some(product) = self.products.get(&product_id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.fetch(&format!("products/{product_id}")).await?;

        // Cache the result
        self.products.insert(product_id, product.clone()).await;

        Ok(product)
    }

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, product_id: ProductId) {
        self.products.invalidate(&product_id).await;
    }

    /// Invalidate all cached products.
    pub async fn invalidate_all(&self) {
        self.products.invalidate_all();
        self.products.run_pending_tasks().await;
    }

    /// Execute a GET request and decode the JSON body.
    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}/{path}", self.base_url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog service returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

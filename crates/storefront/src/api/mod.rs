//! Storefront REST API client.
//!
//! # Endpoints
//!
//! - `GET /products?visible=true` - visible products, newest first
//! - `GET /categories` - product categories
//! - `GET /carousel?active=true` - active home page slides
//! - `POST /orders` - place an order
//! - `PUT /products/{id}` - admin stock update
//!
//! Catalog reads are cached using `moka` (5 minute TTL by default). Any
//! write through this client invalidates the cache.

mod cache;
pub mod types;

use std::collections::HashMap;
use std::sync::Arc;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use sia_core::{Product, ProductId};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::catalog::CatalogSnapshot;
use crate::config::ApiConfig;

use cache::{CacheKey, CacheValue};
pub use types::{
    ApiProduct, CarouselSlide, Category, OrderCustomer, OrderItem, OrderReceipt, OrderRequest,
    StockUpdate, StockUpdateError,
};
use types::{
    CarouselPayload, CategoriesPayload, Envelope, OrderPayload, ProductPayload, ProductsPayload,
};

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed or timed out.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The API answered `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client can't be initialized.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Drop every cached catalog response.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    fn endpoint(&self, path: &str, query: Option<(&str, &str)>) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.join(path)?;
        if let Some((key, value)) = query {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    /// Send a request and unwrap the response envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Envelope<T>, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let envelope = serde_json::from_str::<Envelope<serde_json::Value>>(&body).ok();

            // A 4xx with a `success: false` envelope is the service refusing
            // the request; its message is meant for the shopper.
            if status.is_client_error()
                && let Some(Envelope {
                    success: false,
                    message: Some(message),
                    ..
                }) = envelope.as_ref()
            {
                tracing::warn!(
                    status = %status,
                    message = %message,
                    "Storefront API rejected request"
                );
                return Err(ApiError::Rejected(message.clone()));
            }

            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Storefront API returned non-success status"
            );
            let message = envelope.and_then(|e| e.message).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = match serde_json::from_str(&body) {
            Ok(e) => e,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse storefront API response"
                );
                return Err(ApiError::Parse(e));
            }
        };

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "Request was not successful".to_string());
            return Err(ApiError::Rejected(message));
        }

        Ok(envelope)
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get all visible products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<ApiProduct>, ApiError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let url = self.endpoint("products", Some(("visible", "true")))?;
        let envelope: Envelope<ProductsPayload> = self.send(self.inner.client.get(url)).await?;
        let products = envelope.data.products;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let url = self.endpoint("categories", None)?;
        let envelope: Envelope<CategoriesPayload> = self.send(self.inner.client.get(url)).await?;
        let categories = envelope.data.categories;

        self.inner
            .cache
            .insert(CacheKey::Categories, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Get active carousel slides sorted by their `order`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn fetch_carousel(&self) -> Result<Vec<CarouselSlide>, ApiError> {
        if let Some(CacheValue::Carousel(slides)) =
            self.inner.cache.get(&CacheKey::Carousel).await
        {
            debug!("Cache hit for carousel");
            return Ok(slides);
        }

        let url = self.endpoint("carousel", Some(("active", "true")))?;
        let envelope: Envelope<CarouselPayload> = self.send(self.inner.client.get(url)).await?;
        let mut slides = envelope.data.slides;
        slides.sort_by_key(|s| s.order);

        self.inner
            .cache
            .insert(CacheKey::Carousel, CacheValue::Carousel(slides.clone()))
            .await;

        Ok(slides)
    }

    /// Load everything the storefront needs to render the catalog.
    ///
    /// Category and carousel failures degrade to empty lists; only a
    /// products failure is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the products request fails.
    #[instrument(skip(self))]
    pub async fn load_catalog(&self) -> Result<CatalogSnapshot, ApiError> {
        let (products, categories, slides) = tokio::join!(
            self.fetch_products(),
            self.fetch_categories(),
            self.fetch_carousel()
        );

        let products = products?;
        let categories = categories.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load categories, continuing without them");
            Vec::new()
        });
        let slides = slides.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load carousel, continuing without it");
            Vec::new()
        });

        let category_names: HashMap<_, _> = categories
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect();

        let products = products
            .into_iter()
            .map(|p| p.into_product(&category_names))
            .collect();

        Ok(CatalogSnapshot {
            products,
            categories,
            slides,
        })
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the service's message if the order
    /// was refused, or another error if the request failed.
    #[instrument(skip(self, order), fields(items = order.items.len()))]
    pub async fn submit_order(
        &self,
        order: &OrderRequest,
    ) -> Result<Option<OrderReceipt>, ApiError> {
        let url = self.endpoint("orders", None)?;
        let envelope: Envelope<OrderPayload> =
            self.send(self.inner.client.post(url).json(order)).await?;

        tracing::info!(
            order_id = envelope.data.order.as_ref().map(|o| o.id.as_str()),
            "Order placed"
        );
        Ok(envelope.data.order)
    }

    // =========================================================================
    // Admin Methods
    // =========================================================================

    /// Replace a product's stock flags.
    ///
    /// Returns the updated product if the API echoes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, update), fields(product_id = %id))]
    pub async fn update_stock(
        &self,
        id: &ProductId,
        update: &StockUpdate,
    ) -> Result<Option<Product>, ApiError> {
        let url = self.endpoint(&format!("products/{}", urlencode_segment(id.as_str())), None)?;
        let envelope: Envelope<ProductPayload> =
            self.send(self.inner.client.put(url).json(update)).await?;

        self.invalidate_cache();
        tracing::info!(
            out_of_stock = update.out_of_stock,
            disabled_variants = update.out_of_stock_variants.len(),
            "Stock updated"
        );

        Ok(envelope.data.product.map(Product::from))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Percent-encode a single path segment.
fn urlencode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

//! Read-only product catalog with a short TTL cache.
//!
//! The catalog changes rarely and is safe to cache; carts and orders are
//! never cached because they are mutable state.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use pepperleaf_core::Product;
use tracing::{debug, instrument};

use crate::api::{ApiClient, ApiError};

const CACHE_KEY: &str = "products";
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Cached access to the product catalog.
#[derive(Clone)]
pub struct ProductCatalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    api: ApiClient,
    cache: Cache<String, Arc<Vec<Product>>>,
}

impl ProductCatalog {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(CatalogInner { api, cache }),
        }
    }

    /// List the catalog, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog fetch fails; failures are not
    /// cached.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(products) = self.inner.cache.get(CACHE_KEY).await {
            debug!("cache hit for products");
            return Ok((*products).clone());
        }

        let products = self.inner.api.products().await?;
        self.inner
            .cache
            .insert(CACHE_KEY.to_string(), Arc::new(products.clone()))
            .await;
        Ok(products)
    }

    /// Drop the cached catalog so the next list re-fetches.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate(CACHE_KEY).await;
    }
}

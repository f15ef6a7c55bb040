//! Catalog resolution with remote-authoritative fallback.
//!
//! # Architecture
//!
//! - A [`CatalogSource`] capability with two implementations: remote (HTTP)
//!   and local (key-value store).
//! - [`CatalogRepository`] composes them: when a remote source is configured
//!   and reachable it is authoritative and overwrites the local cache;
//!   otherwise the local cache answers; an empty catalog is a valid state.
//! - A `moka` in-process cache holds the last successful listing and is
//!   invalidated by every create/update/delete.

mod product;
mod remote;
mod source;

pub use product::{Product, ProductDraft, ProductPatch};
pub use remote::{RemoteCatalogSource, RemoteError};
pub use source::{CatalogSource, LocalCatalogSource};

use std::sync::Arc;
use std::time::Duration;

use fernhill_core::ProductId;
use moka::future::Cache;
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::store::KeyValueStore;

/// Cache key for resolved listings.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CacheKey {
    ProductList,
}

/// Sentinel category meaning "no filtering".
const ALL_CATEGORIES: &str = "all";

/// Resolves the authoritative product list and routes catalog mutations.
pub struct CatalogRepository {
    local: LocalCatalogSource,
    remote: Option<Arc<dyn CatalogSource>>,
    cache: Cache<CacheKey, Arc<Vec<Product>>>,
}

impl CatalogRepository {
    /// Create a repository from engine configuration.
    ///
    /// Builds a [`RemoteCatalogSource`] when remote configuration is present;
    /// otherwise the repository runs local-only.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, config: &EngineConfig) -> Self {
        let remote: Option<Arc<dyn CatalogSource>> = config
            .remote
            .as_ref()
            .map(|remote| Arc::new(RemoteCatalogSource::new(remote)) as Arc<dyn CatalogSource>);
        Self::with_sources(
            LocalCatalogSource::new(store, config.storage.catalog.clone()),
            remote,
        )
    }

    /// Create a repository from explicit sources (injection seam for tests
    /// and alternative remote implementations).
    #[must_use]
    pub fn with_sources(
        local: LocalCatalogSource,
        remote: Option<Arc<dyn CatalogSource>>,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();
        Self {
            local,
            remote,
            cache,
        }
    }

    /// Resolve the full product list.
    ///
    /// Resolution order: in-process cache, then remote (authoritative,
    /// overwrites the local cache), then local cache, then empty. Remote
    /// failures are logged and degrade to the local path; they are never
    /// surfaced to the caller of a read.
    ///
    /// # Errors
    ///
    /// Returns `Storage` only when the local cache holds malformed state.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        if let Some(products) = self.cache.get(&CacheKey::ProductList).await {
            debug!("cache hit for product list");
            return Ok((*products).clone());
        }

        if let Some(remote) = &self.remote {
            match remote.list().await {
                Ok(products) => {
                    // Remote is authoritative: refresh the local cache copy.
                    self.local.replace_all(&products)?;
                    self.cache
                        .insert(CacheKey::ProductList, Arc::new(products.clone()))
                        .await;
                    return Ok(products);
                }
                Err(e) => {
                    warn!(error = %e, "remote catalog unreachable, falling back to local cache");
                }
            }
        }

        let products = self.local.load()?;
        if self.remote.is_none() {
            // Only cache local results when no remote is configured, so a
            // recovering remote is retried on the next listing.
            self.cache
                .insert(CacheKey::ProductList, Arc::new(products.clone()))
                .await;
        }
        Ok(products)
    }

    /// Look up a product by id within the resolved list.
    ///
    /// Identifier equality is value-based, so a numeric id finds a record
    /// stored with the string form and vice versa. Absence is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Propagates listing errors (malformed local state).
    pub async fn product_by_id(&self, id: &ProductId) -> Result<Option<Product>> {
        let products = self.list_products().await?;
        Ok(products.into_iter().find(|p| &p.id == id))
    }

    /// Create a product on the authoritative source.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a structurally invalid draft, or
    /// `SourceUnavailable` when the configured remote rejects the write.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product> {
        draft.validate().map_err(EngineError::Validation)?;
        let product = self.authoritative().insert(draft).await?;
        self.invalidate().await;
        Ok(product)
    }

    /// Update fields on a product. `Ok(None)` when the id does not exist;
    /// a missing id never creates a record.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a non-positive price in the patch, or
    /// `SourceUnavailable` when the configured remote rejects the write.
    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>> {
        if let Some(price) = patch.price
            && price <= Decimal::ZERO
        {
            return Err(EngineError::Validation(vec![
                "Valid price is required".to_string(),
            ]));
        }
        let updated = self.authoritative().update(id, patch).await?;
        self.invalidate().await;
        Ok(updated)
    }

    /// Delete a product. Returns whether a record was removed.
    ///
    /// # Errors
    ///
    /// Returns `SourceUnavailable` when the configured remote rejects the
    /// write.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<bool> {
        let removed = self.authoritative().delete(id).await?;
        self.invalidate().await;
        Ok(removed)
    }

    fn authoritative(&self) -> &dyn CatalogSource {
        self.remote.as_deref().unwrap_or(&self.local)
    }

    async fn invalidate(&self) {
        self.cache.invalidate(&CacheKey::ProductList).await;
        self.cache.run_pending_tasks().await;
    }
}

// =============================================================================
// Pure listing transforms
// =============================================================================

/// Case-insensitive substring search over name, description, and category.
///
/// A blank or whitespace-only query is the identity transform, preserving
/// order, never an empty result.
#[must_use]
pub fn search(products: &[Product], query: &str) -> Vec<Product> {
    let query = query.trim();
    if query.is_empty() {
        return products.to_vec();
    }
    let needle = query.to_lowercase();
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
                || p.category.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Exact case-insensitive category match.
///
/// `None` or the sentinel `"all"` is the identity transform.
#[must_use]
pub fn filter_by_category(products: &[Product], category: Option<&str>) -> Vec<Product> {
    match category {
        None => products.to_vec(),
        Some(c) if c.eq_ignore_ascii_case(ALL_CATEGORIES) => products.to_vec(),
        Some(c) => products
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(c))
            .cloned()
            .collect(),
    }
}

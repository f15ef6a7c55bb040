//! Catalog source capability and the local (KV-backed) implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use fernhill_core::ProductId;
use tracing::debug;

use crate::error::Result;
use crate::store::{KeyValueStore, KeyValueStoreExt, StoreError};

use super::product::{Product, ProductDraft, ProductPatch};

/// A source of authoritative product records.
///
/// Two implementations exist: [`RemoteCatalogSource`](super::RemoteCatalogSource)
/// when a remote service is configured, and [`LocalCatalogSource`] over the
/// persistent key-value store. The repository composes them with fallback
/// instead of branching on "is remote configured" at each call site.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// List all products, newest first where the source tracks creation time.
    async fn list(&self) -> Result<Vec<Product>>;

    /// Insert a record, returning the stored record with its assigned id.
    async fn insert(&self, draft: ProductDraft) -> Result<Product>;

    /// Update fields on a record. Returns `None` (and changes nothing) when
    /// the id does not exist; a missing id must never create a record.
    async fn update(&self, id: &ProductId, patch: ProductPatch) -> Result<Option<Product>>;

    /// Delete a record. Returns whether a record was removed.
    async fn delete(&self, id: &ProductId) -> Result<bool>;
}

/// Catalog source backed by the persistent key-value store.
pub struct LocalCatalogSource {
    store: Arc<dyn KeyValueStore>,
    slot: String,
}

impl LocalCatalogSource {
    /// Create a source reading and writing the given storage slot.
    pub fn new(store: Arc<dyn KeyValueStore>, slot: impl Into<String>) -> Self {
        Self {
            store,
            slot: slot.into(),
        }
    }

    /// Read the stored product list; an absent slot is an empty catalog.
    pub(crate) fn load(&self) -> std::result::Result<Vec<Product>, StoreError> {
        Ok(self.store.get_json(&self.slot)?.unwrap_or_default())
    }

    fn save(&self, products: &[Product]) -> std::result::Result<(), StoreError> {
        self.store.put_json(&self.slot, &products)
    }

    /// Overwrite the stored list wholesale.
    ///
    /// Used by the repository to sync an authoritative remote listing into
    /// the local slot, and by embedders to seed a catalog.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the write fails.
    pub fn replace_all(&self, products: &[Product]) -> std::result::Result<(), StoreError> {
        self.save(products)
    }

    /// Mint the next sequential numeric id, matching the legacy scheme.
    fn next_id(products: &[Product]) -> ProductId {
        let max = ProductId::max_numeric(products.iter().map(|p| &p.id)).unwrap_or(0);
        ProductId::from(max + 1)
    }
}

#[async_trait]
impl CatalogSource for LocalCatalogSource {
    async fn list(&self) -> Result<Vec<Product>> {
        Ok(self.load()?)
    }

    async fn insert(&self, draft: ProductDraft) -> Result<Product> {
        let mut products = self.load()?;
        let product = draft.into_product(Self::next_id(&products), Utc::now());
        products.push(product.clone());
        self.save(&products)?;
        debug!(id = %product.id, "inserted product into local catalog");
        Ok(product)
    }

    async fn update(&self, id: &ProductId, patch: ProductPatch) -> Result<Option<Product>> {
        let mut products = self.load()?;
        let Some(existing) = products.iter_mut().find(|p| &p.id == id) else {
            return Ok(None);
        };
        patch.apply(existing);
        let updated = existing.clone();
        self.save(&products)?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: &ProductId) -> Result<bool> {
        let mut products = self.load()?;
        let before = products.len();
        products.retain(|p| &p.id != id);
        let removed = products.len() != before;
        if removed {
            self.save(&products)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rust_decimal_macros::dec;

    fn source() -> LocalCatalogSource {
        LocalCatalogSource::new(Arc::new(MemoryStore::new()), "pharmacy_products")
    }

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: String::new(),
            price: dec!(4.99),
            stock: 10,
            category: "otc".to_string(),
            image: None,
            requires_prescription: false,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_numeric_ids() {
        let source = source();
        let first = source.insert(draft("Aspirin")).await.unwrap();
        let second = source.insert(draft("Bandages")).await.unwrap();
        assert_eq!(first.id, ProductId::from(1));
        assert_eq!(second.id, ProductId::from(2));
    }

    #[tokio::test]
    async fn update_missing_id_is_a_noop() {
        let source = source();
        source.insert(draft("Aspirin")).await.unwrap();
        let patch = ProductPatch {
            price: Some(dec!(9.99)),
            ..ProductPatch::default()
        };
        let result = source.update(&ProductId::from(42), patch).await.unwrap();
        assert!(result.is_none());
        // No record was created as a side effect.
        assert_eq!(source.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_matches_ids_by_value() {
        let source = source();
        let product = source.insert(draft("Aspirin")).await.unwrap();
        let patch = ProductPatch {
            stock: Some(99),
            ..ProductPatch::default()
        };
        // String form of the numeric id resolves the same record.
        let updated = source
            .update(&ProductId::from(product.id.to_string()), patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.stock, 99);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let source = source();
        let product = source.insert(draft("Aspirin")).await.unwrap();
        assert!(source.delete(&product.id).await.unwrap());
        assert!(!source.delete(&product.id).await.unwrap());
        assert!(source.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_slot_lists_as_empty_catalog() {
        assert!(source().list().await.unwrap().is_empty());
    }
}

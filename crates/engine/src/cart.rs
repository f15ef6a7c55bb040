//! In-session cart with a derived, always-consistent subtotal.
//!
//! The central invariant: `subtotal == Σ(item.price × item.quantity)` after
//! every mutation. The subtotal is never independently settable; every
//! mutating operation recomputes it and persists the cart before returning,
//! so a read immediately after a mutation observes the updated state.

use std::sync::Arc;

use fernhill_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::{CatalogRepository, Product};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::store::{KeyValueStore, KeyValueStoreExt};

/// One cart line: a product snapshot and a quantity.
///
/// The snapshot is taken at add-time; later catalog edits do not reprice the
/// line until the item is re-added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    product: Product,
    /// Always `>= 1`; a line reaching zero is removed, never stored.
    quantity: u32,
}

impl CartItem {
    /// The product snapshot this line was added with.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Quantity of this line, always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Line total: snapshot price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// An ordered cart with a derived subtotal.
///
/// Insertion order is display order; product ids are unique across lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
    subtotal: Decimal,
}

impl Cart {
    /// The cart lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Derived subtotal over all lines.
    #[must_use]
    pub const fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all lines (badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(CartItem::quantity).sum()
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product.id == id)
    }

    fn recompute_subtotal(&mut self) {
        self.subtotal = self.items.iter().map(CartItem::line_total).sum();
    }
}

/// Owns all cart mutations and keeps the persisted copy in step.
pub struct CartStore {
    store: Arc<dyn KeyValueStore>,
    catalog: Arc<CatalogRepository>,
    slot: String,
}

impl CartStore {
    /// Create a cart store over the given persistence and catalog.
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        catalog: Arc<CatalogRepository>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            slot: config.storage.cart.clone(),
        }
    }

    /// The current cart; an empty cart when nothing is stored, never an
    /// absent value.
    ///
    /// The subtotal is recomputed on load, so a hand-edited persisted copy
    /// cannot break the derivation invariant.
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the persisted cart is malformed.
    pub fn cart(&self) -> Result<Cart> {
        let mut cart: Cart = self.store.get_json(&self.slot)?.unwrap_or_default();
        cart.recompute_subtotal();
        Ok(cart)
    }

    /// Add `quantity` of a product, resolving it through the catalog.
    ///
    /// An already-present product increments its quantity rather than
    /// duplicating the line; a new product appends a snapshot line.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` when the id does not resolve.
    #[instrument(skip(self), fields(id = %product_id, quantity))]
    pub async fn add_item(&self, product_id: &ProductId, quantity: u32) -> Result<Cart> {
        let quantity = quantity.max(1);
        let product = self
            .catalog
            .product_by_id(product_id)
            .await?
            .ok_or_else(|| EngineError::ProductNotFound(product_id.to_string()))?;

        let mut cart = self.cart()?;
        match cart.items.iter_mut().find(|item| &item.product.id == product_id) {
            Some(existing) => existing.quantity += quantity,
            None => cart.items.push(CartItem { product, quantity }),
        }
        self.commit(cart)
    }

    /// Set the quantity of a line directly.
    ///
    /// Zero is normalized to a removal; a product not in the cart is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on persistence failure.
    #[instrument(skip(self), fields(id = %product_id, quantity))]
    pub fn update_quantity(&self, product_id: &ProductId, quantity: u32) -> Result<Cart> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }
        let mut cart = self.cart()?;
        if let Some(item) = cart.items.iter_mut().find(|item| &item.product.id == product_id) {
            item.quantity = quantity;
            return self.commit(cart);
        }
        Ok(cart)
    }

    /// Remove a line if present; no-op otherwise.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on persistence failure.
    #[instrument(skip(self), fields(id = %product_id))]
    pub fn remove_item(&self, product_id: &ProductId) -> Result<Cart> {
        let mut cart = self.cart()?;
        cart.items.retain(|item| &item.product.id != product_id);
        self.commit(cart)
    }

    /// Reset to an empty cart and persist it.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on persistence failure.
    pub fn clear(&self) -> Result<Cart> {
        self.commit(Cart::default())
    }

    /// Sum of quantities across all lines.
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the persisted cart is malformed.
    pub fn item_count(&self) -> Result<u32> {
        Ok(self.cart()?.item_count())
    }

    /// Recompute the subtotal and persist before returning the cart.
    fn commit(&self, mut cart: Cart) -> Result<Cart> {
        cart.recompute_subtotal();
        self.store.put_json(&self.slot, &cart)?;
        Ok(cart)
    }
}

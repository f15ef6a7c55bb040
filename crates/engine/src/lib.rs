//! Fernhill Engine - the commerce state engine behind the storefront.
//!
//! # Architecture
//!
//! Three components, composed over an injected [`store::KeyValueStore`]:
//!
//! - [`catalog`] - resolves the authoritative product list from a remote
//!   source when configured, else the local cache, else empty; mutations
//!   invalidate the in-process listing cache.
//! - [`cart`] - owns the in-session line items and a derived subtotal that
//!   is recomputed and persisted on every mutation.
//! - [`checkout`] - pure pricing derivation, the prescription gate, form
//!   validation, and the per-session readiness state machine.
//!
//! Page rendering, toasts, and navigation live outside this crate and
//! consume only the types re-exported here.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fernhill_engine::{
//!     cart::CartStore, catalog::CatalogRepository, checkout::CheckoutSession,
//!     config::EngineConfig, store::JsonFileStore,
//! };
//!
//! let config = EngineConfig::from_env()?;
//! let store = Arc::new(JsonFileStore::open("state.json")?);
//! let catalog = Arc::new(CatalogRepository::new(store.clone(), &config));
//! let cart = CartStore::new(store, catalog.clone(), &config);
//! let mut session = CheckoutSession::new(config.pricing.clone());
//!
//! let products = catalog.list_products().await?;
//! cart.add_item(&products[0].id, 1).await?;
//! let summary = session.summarize(&cart.cart()?);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod store;

pub use cart::{Cart, CartItem, CartStore};
pub use catalog::{CatalogRepository, CatalogSource, Product, ProductDraft, ProductPatch};
pub use checkout::{
    CheckoutForm, CheckoutSession, CheckoutState, CheckoutSummary, CheckoutSummaryView,
    requires_prescription,
    validate_checkout_form,
};
pub use config::{EngineConfig, PricingConfig};
pub use error::{EngineError, Result};

//! Integration test support for the Fernhill commerce engine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fernhill-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_flow` - full browse/cart/checkout journeys
//! - `catalog_fallback` - remote-or-local resolution and cache invalidation
//! - `persistence` - state survival across store reopen
//!
//! The harness wires the engine over an in-memory store and optional remote
//! doubles; no network or filesystem is touched unless a test opts in.

// Test support code: unwraps are acceptable here, as in #[cfg(test)] modules.
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use fernhill_core::ProductId;
use fernhill_engine::cart::CartStore;
use fernhill_engine::catalog::{
    CatalogRepository, CatalogSource, LocalCatalogSource, Product, ProductDraft, ProductPatch,
    RemoteError,
};
use fernhill_engine::checkout::{CheckoutForm, CheckoutSession};
use fernhill_engine::config::EngineConfig;
use fernhill_engine::error::Result;
use fernhill_engine::store::{KeyValueStore, MemoryStore};
use rust_decimal_macros::dec;

/// A fully wired engine over an in-memory store.
pub struct TestHarness {
    pub store: Arc<dyn KeyValueStore>,
    pub catalog: Arc<CatalogRepository>,
    pub cart: CartStore,
    pub config: EngineConfig,
}

impl TestHarness {
    /// Harness with a seeded local catalog and no remote source.
    #[must_use]
    pub fn local(products: &[Product]) -> Self {
        Self::with_remote(products, None)
    }

    /// Harness with a seeded local catalog and an injected remote source.
    #[must_use]
    pub fn with_remote(products: &[Product], remote: Option<Arc<dyn CatalogSource>>) -> Self {
        let config = EngineConfig::local_only();
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let local = LocalCatalogSource::new(Arc::clone(&store), config.storage.catalog.clone());
        local.replace_all(products).unwrap();
        let catalog = Arc::new(CatalogRepository::with_sources(local, remote));
        let cart = CartStore::new(Arc::clone(&store), Arc::clone(&catalog), &config);
        Self {
            store,
            catalog,
            cart,
            config,
        }
    }

    /// A checkout session using this harness's pricing configuration.
    #[must_use]
    pub fn checkout_session(&self) -> CheckoutSession {
        CheckoutSession::new(self.config.pricing.clone())
    }
}

/// Pharmacy-flavored seed catalog used across the integration tests.
///
/// Products 101 and 202 are the built-in interacting pair; 303 requires a
/// prescription.
#[must_use]
pub fn seed_catalog() -> Vec<Product> {
    let created = |day: u32| Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).single();
    vec![
        Product {
            id: ProductId::from(101),
            name: "Loratadine 10mg".to_string(),
            description: "Non-drowsy antihistamine tablets".to_string(),
            price: dec!(12.99),
            stock: 120,
            category: "allergy".to_string(),
            image: Some("images/loratadine.jpg".to_string()),
            requires_prescription: false,
            created_at: created(1),
        },
        Product {
            id: ProductId::from(202),
            name: "Ibuprofen 200mg".to_string(),
            description: "Pain and fever relief".to_string(),
            price: dec!(6.49),
            stock: 300,
            category: "pain-relief".to_string(),
            image: None,
            requires_prescription: false,
            created_at: created(2),
        },
        Product {
            id: ProductId::from(303),
            name: "Amoxicillin 500mg".to_string(),
            description: "Broad-spectrum antibiotic capsules".to_string(),
            price: dec!(24.00),
            stock: 40,
            category: "antibiotics".to_string(),
            image: None,
            requires_prescription: true,
            created_at: created(3),
        },
        Product {
            id: ProductId::from(404),
            name: "Vitamin D3 1000IU".to_string(),
            description: "Daily supplement".to_string(),
            price: dec!(8.75),
            stock: 200,
            category: "vitamins".to_string(),
            image: None,
            requires_prescription: false,
            created_at: created(4),
        },
    ]
}

/// A complete, valid checkout form.
#[must_use]
pub fn complete_form() -> CheckoutForm {
    CheckoutForm {
        full_name: "Avery Quinn".to_string(),
        address: "12 Fern Hill Rd".to_string(),
        city: "Portsmouth".to_string(),
        zip_code: "03801".to_string(),
        phone: "555-0142".to_string(),
        card_number: "4242424242424242".to_string(),
        card_expiry: "12/27".to_string(),
        card_cvv: "123".to_string(),
    }
}

// =============================================================================
// Remote Doubles
// =============================================================================

/// In-memory remote catalog that can be taken offline mid-test.
pub struct ToggleRemote {
    products: Mutex<Vec<Product>>,
    online: Mutex<bool>,
    next_id: Mutex<u32>,
}

impl ToggleRemote {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            online: Mutex::new(true),
            next_id: Mutex::new(1),
        }
    }

    pub fn set_online(&self, online: bool) {
        *self.online.lock().unwrap() = online;
    }

    fn check_online(&self) -> Result<()> {
        if *self.online.lock().unwrap() {
            Ok(())
        } else {
            Err(RemoteError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            }
            .into())
        }
    }
}

#[async_trait]
impl CatalogSource for ToggleRemote {
    async fn list(&self) -> Result<Vec<Product>> {
        self.check_online()?;
        // Newest first, as the real service orders listings.
        let mut products = self.products.lock().unwrap().clone();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn insert(&self, draft: ProductDraft) -> Result<Product> {
        self.check_online()?;
        let id = {
            let mut next = self.next_id.lock().unwrap();
            let id = format!("srv-{:04}", *next);
            *next += 1;
            id
        };
        let product = draft.into_product(ProductId::from(id), Utc::now());
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: &ProductId, patch: ProductPatch) -> Result<Option<Product>> {
        self.check_online()?;
        let mut products = self.products.lock().unwrap();
        let Some(existing) = products.iter_mut().find(|p| &p.id == id) else {
            return Ok(None);
        };
        patch.apply(existing);
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: &ProductId) -> Result<bool> {
        self.check_online()?;
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| &p.id != id);
        Ok(products.len() != before)
    }
}

/// Install a test subscriber once per process, honoring `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

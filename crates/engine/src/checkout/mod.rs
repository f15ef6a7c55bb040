//! Pricing and checkout orchestration.
//!
//! Derives shipping, tax, and the prescription gate from a cart snapshot,
//! validates checkout input, and drives the per-session readiness state
//! machine:
//!
//! ```text
//! Empty -> (item added) -> PrescriptionPending -> (acknowledgement) -> Ready
//!   ^                         (when any line requires a prescription)
//!   |
//!   +---- (order submitted, cart cleared) <- Submitting <- Ready
//! ```

mod interactions;
mod pricing;
mod validation;

pub use interactions::{InteractionRule, InteractionTable};
pub use pricing::{CheckoutSummary, CheckoutSummaryView, price_cart};
pub use validation::{CheckoutForm, ValidationReport, validate_checkout_form};

use fernhill_core::OrderId;
use tracing::{info, instrument};

use crate::cart::{Cart, CartStore};
use crate::config::PricingConfig;
use crate::error::{EngineError, Result};

/// Whether any line's product snapshot requires a prescription.
#[must_use]
pub fn requires_prescription(cart: &Cart) -> bool {
    cart.items()
        .iter()
        .any(|item| item.product().requires_prescription)
}

/// Session-scoped prescription acknowledgement.
///
/// Deliberately not persisted with the cart: a reloaded session starts with
/// the gate closed again.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrescriptionGate {
    acknowledged: bool,
}

impl PrescriptionGate {
    /// Record that a prescription was provided for this session.
    pub const fn record_acknowledgement(&mut self) {
        self.acknowledged = true;
    }

    /// Whether an acknowledgement has been recorded.
    #[must_use]
    pub const fn acknowledged(&self) -> bool {
        self.acknowledged
    }

    /// Whether the gate permits checkout for this cart.
    #[must_use]
    pub fn permits(&self, cart: &Cart) -> bool {
        self.acknowledged || !requires_prescription(cart)
    }
}

/// Checkout readiness, derived per session from the cart and gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    /// Cart has no items; checkout entry redirects away.
    Empty,
    /// A line requires a prescription and none has been acknowledged.
    PrescriptionPending,
    /// Checkout may proceed to form validation.
    Ready,
    /// Order submission in flight.
    Submitting,
}

/// Per-session checkout orchestrator.
pub struct CheckoutSession {
    pricing: PricingConfig,
    interactions: InteractionTable,
    gate: PrescriptionGate,
    submitting: bool,
}

impl CheckoutSession {
    /// Start a session with the given pricing constants and the default
    /// interaction table.
    #[must_use]
    pub fn new(pricing: PricingConfig) -> Self {
        Self::with_interactions(pricing, InteractionTable::default())
    }

    /// Start a session with an explicit interaction rule table.
    #[must_use]
    pub const fn with_interactions(pricing: PricingConfig, interactions: InteractionTable) -> Self {
        Self {
            pricing,
            interactions,
            gate: PrescriptionGate { acknowledged: false },
            submitting: false,
        }
    }

    /// Current readiness for the given cart snapshot.
    #[must_use]
    pub fn state(&self, cart: &Cart) -> CheckoutState {
        if self.submitting {
            CheckoutState::Submitting
        } else if cart.is_empty() {
            CheckoutState::Empty
        } else if self.gate.permits(cart) {
            CheckoutState::Ready
        } else {
            CheckoutState::PrescriptionPending
        }
    }

    /// Record a prescription acknowledgement (e.g., an upload event).
    ///
    /// The only transition out of [`CheckoutState::PrescriptionPending`].
    pub const fn acknowledge_prescription(&mut self) {
        self.gate.record_acknowledgement();
    }

    /// Price the cart and derive the checkout permission flag.
    #[must_use]
    pub fn summarize(&self, cart: &Cart) -> CheckoutSummary {
        price_cart(cart, &self.pricing, &self.gate)
    }

    /// Advisory interaction warnings for the cart; never blocks checkout.
    #[must_use]
    pub fn interaction_warnings(&self, cart: &Cart) -> Vec<String> {
        self.interactions.check(cart.items())
    }

    /// Validate the form, submit the order, and clear the cart.
    ///
    /// Submission is an external collaborator, stubbed as an asynchronous
    /// call that always succeeds. On completion the cart is cleared and the
    /// session returns to [`CheckoutState::Empty`].
    ///
    /// # Errors
    ///
    /// Returns `MutationRejected` when the cart is empty or the prescription
    /// gate is closed, and `Validation` with the per-field messages when the
    /// form is incomplete.
    #[instrument(skip(self, cart_store, form))]
    pub async fn submit_order(
        &mut self,
        cart_store: &CartStore,
        form: &CheckoutForm,
    ) -> Result<OrderId> {
        let cart = cart_store.cart()?;
        match self.state(&cart) {
            CheckoutState::Empty => {
                return Err(EngineError::MutationRejected(
                    "cannot submit an order from an empty cart".to_string(),
                ));
            }
            CheckoutState::PrescriptionPending => {
                return Err(EngineError::MutationRejected(
                    "prescription acknowledgement required before checkout".to_string(),
                ));
            }
            CheckoutState::Submitting => {
                return Err(EngineError::MutationRejected(
                    "an order submission is already in flight".to_string(),
                ));
            }
            CheckoutState::Ready => {}
        }

        let report = validate_checkout_form(form);
        if !report.is_valid {
            return Err(EngineError::Validation(report.errors));
        }

        let total = self.summarize(&cart).total;
        self.submitting = true;
        let result = place_order(&cart).await;
        self.submitting = false;
        let order_id = result?;

        cart_store.clear()?;
        info!(order_id = %order_id, %total, "order submitted");
        Ok(order_id)
    }
}

/// Stubbed order submission to the external order service.
///
/// Always succeeds in the current scope; the suspension point models the
/// real transport.
async fn place_order(_cart: &Cart) -> Result<OrderId> {
    tokio::task::yield_now().await;
    Ok(OrderId::generate())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogRepository, LocalCatalogSource, Product};
    use crate::config::EngineConfig;
    use crate::store::MemoryStore;
    use fernhill_core::ProductId;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn product(id: i64, price: Decimal, requires_prescription: bool) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("Product {id}"),
            description: String::new(),
            price,
            stock: 10,
            category: "otc".to_string(),
            image: None,
            requires_prescription,
            created_at: None,
        }
    }

    fn fixture(products: &[Product]) -> CartStore {
        let store: Arc<dyn crate::store::KeyValueStore> = Arc::new(MemoryStore::new());
        let config = EngineConfig::local_only();
        let local = LocalCatalogSource::new(Arc::clone(&store), config.storage.catalog.clone());
        local.replace_all(products).unwrap();
        let catalog = Arc::new(CatalogRepository::with_sources(local, None));
        CartStore::new(store, catalog, &config)
    }

    fn complete_form() -> CheckoutForm {
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

    #[tokio::test]
    async fn pricing_below_threshold_charges_shipping() {
        let cart_store = fixture(&[product(1, dec!(45), false)]);
        cart_store.add_item(&ProductId::from(1), 1).await.unwrap();
        let session = CheckoutSession::new(PricingConfig::default());

        let summary = session.summarize(&cart_store.cart().unwrap());
        assert_eq!(summary.subtotal, dec!(45));
        assert_eq!(summary.shipping, dec!(5.99));
        assert_eq!(summary.tax, dec!(3.60));
        assert_eq!(summary.total, dec!(54.59));
        assert!(summary.checkout_allowed);
    }

    #[tokio::test]
    async fn pricing_at_threshold_waives_shipping() {
        let cart_store = fixture(&[product(1, dec!(60), false)]);
        cart_store.add_item(&ProductId::from(1), 1).await.unwrap();
        let session = CheckoutSession::new(PricingConfig::default());

        let summary = session.summarize(&cart_store.cart().unwrap());
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.tax, dec!(4.80));
        assert_eq!(summary.total, dec!(64.80));

        let view = summary.view("$");
        assert_eq!(view.shipping, "FREE");
        assert_eq!(view.total, "$64.80");
    }

    #[tokio::test]
    async fn prescription_gate_blocks_until_acknowledged() {
        let cart_store = fixture(&[product(1, dec!(20), true)]);
        cart_store.add_item(&ProductId::from(1), 1).await.unwrap();
        let cart = cart_store.cart().unwrap();

        let mut session = CheckoutSession::new(PricingConfig::default());
        assert!(requires_prescription(&cart));
        assert_eq!(session.state(&cart), CheckoutState::PrescriptionPending);
        assert!(!session.summarize(&cart).checkout_allowed);

        session.acknowledge_prescription();
        assert_eq!(session.state(&cart), CheckoutState::Ready);
        assert!(session.summarize(&cart).checkout_allowed);
    }

    #[tokio::test]
    async fn empty_cart_is_terminal_until_an_item_is_added() {
        let cart_store = fixture(&[product(1, dec!(10), false)]);
        let mut session = CheckoutSession::new(PricingConfig::default());
        assert_eq!(session.state(&cart_store.cart().unwrap()), CheckoutState::Empty);

        // Acknowledgement alone does not leave Empty.
        session.acknowledge_prescription();
        assert_eq!(session.state(&cart_store.cart().unwrap()), CheckoutState::Empty);

        let cart = cart_store.add_item(&ProductId::from(1), 1).await.unwrap();
        assert_eq!(session.state(&cart), CheckoutState::Ready);
    }

    #[tokio::test]
    async fn submit_clears_cart_and_returns_to_empty() {
        let cart_store = fixture(&[product(1, dec!(10), false)]);
        cart_store.add_item(&ProductId::from(1), 2).await.unwrap();

        let mut session = CheckoutSession::new(PricingConfig::default());
        let order_id = session
            .submit_order(&cart_store, &complete_form())
            .await
            .unwrap();
        assert!(!order_id.to_string().is_empty());

        let cart = cart_store.cart().unwrap();
        assert!(cart.is_empty());
        assert_eq!(session.state(&cart), CheckoutState::Empty);
    }

    #[tokio::test]
    async fn submit_from_empty_cart_is_rejected() {
        let cart_store = fixture(&[]);
        let mut session = CheckoutSession::new(PricingConfig::default());
        let err = session
            .submit_order(&cart_store, &complete_form())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MutationRejected(_)));
    }

    #[tokio::test]
    async fn submit_with_closed_gate_is_rejected() {
        let cart_store = fixture(&[product(1, dec!(10), true)]);
        cart_store.add_item(&ProductId::from(1), 1).await.unwrap();

        let mut session = CheckoutSession::new(PricingConfig::default());
        let err = session
            .submit_order(&cart_store, &complete_form())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MutationRejected(_)));

        // Cart is untouched by the rejection.
        assert_eq!(cart_store.cart().unwrap().item_count(), 1);
    }

    #[tokio::test]
    async fn submit_with_incomplete_form_reports_field_errors() {
        let cart_store = fixture(&[product(1, dec!(10), false)]);
        cart_store.add_item(&ProductId::from(1), 1).await.unwrap();

        let mut session = CheckoutSession::new(PricingConfig::default());
        let mut form = complete_form();
        form.address = String::new();
        form.phone = String::new();

        let err = session.submit_order(&cart_store, &form).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(messages) if messages.len() == 2));
    }
}

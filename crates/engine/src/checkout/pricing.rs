//! Pure pricing derivation for a cart snapshot.

use fernhill_core::Money;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::cart::Cart;
use crate::config::PricingConfig;

use super::PrescriptionGate;

/// A fully priced checkout summary.
///
/// Ephemeral: derived on demand from the current cart, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub subtotal: Decimal,
    /// Zero at or above the free-shipping threshold, else the flat fee.
    pub shipping: Decimal,
    /// `subtotal × tax_rate`.
    pub tax: Decimal,
    /// `subtotal + shipping + tax`.
    pub total: Decimal,
    /// Whether checkout may proceed (non-empty cart, prescription gate open).
    pub checkout_allowed: bool,
}

impl CheckoutSummary {
    /// Display-formatted summary for a rendering layer.
    #[must_use]
    pub fn view(&self, currency_symbol: &str) -> CheckoutSummaryView {
        CheckoutSummaryView {
            subtotal: Money::new(self.subtotal).display(currency_symbol),
            shipping: if self.shipping.is_zero() {
                "FREE".to_string()
            } else {
                Money::new(self.shipping).display(currency_symbol)
            },
            tax: Money::new(self.tax).display(currency_symbol),
            total: Money::new(self.total).display(currency_symbol),
        }
    }
}

/// A [`CheckoutSummary`] formatted for display. Waived shipping renders as
/// `FREE` rather than a zero amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummaryView {
    pub subtotal: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
}

/// Price a cart snapshot against the configured constants.
///
/// Pure and deterministic: safe to call repeatedly for live summary updates
/// as the cart changes.
#[must_use]
pub fn price_cart(cart: &Cart, pricing: &PricingConfig, gate: &PrescriptionGate) -> CheckoutSummary {
    let subtotal = cart.subtotal();
    let shipping = if subtotal >= pricing.free_shipping_threshold {
        Decimal::ZERO
    } else {
        pricing.shipping_cost
    };
    let tax = subtotal * pricing.tax_rate;
    CheckoutSummary {
        subtotal,
        shipping,
        tax,
        total: subtotal + shipping + tax,
        checkout_allowed: !cart.is_empty() && gate.permits(cart),
    }
}

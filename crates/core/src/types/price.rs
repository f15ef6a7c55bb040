//! Monetary amounts using decimal arithmetic.
//!
//! Prices never touch floating point: all amounts are `rust_decimal::Decimal`
//! so subtotals and tax derivations stay exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount.
///
/// The currency symbol is presentation configuration (injected at the engine
/// boundary), so `Money` carries only the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display with a currency symbol (e.g., `"$19.99"`).
    ///
    /// Always renders two fractional digits, matching receipt conventions.
    #[must_use]
    pub fn display(&self, symbol: &str) -> String {
        format!("{symbol}{:.2}", self.0.round_dp(2))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn display_pads_to_two_decimals() {
        assert_eq!(Money::new(dec!(5)).display("$"), "$5.00");
        assert_eq!(Money::new(dec!(5.9)).display("$"), "$5.90");
        assert_eq!(Money::new(dec!(5.999)).display("$"), "$6.00");
    }

    #[test]
    fn display_uses_injected_symbol() {
        assert_eq!(Money::new(dec!(12.5)).display("€"), "€12.50");
    }

    #[test]
    fn addition_is_exact() {
        let total = Money::new(dec!(0.1)) + Money::new(dec!(0.2));
        assert_eq!(total.amount(), dec!(0.3));
    }
}

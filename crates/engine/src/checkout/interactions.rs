//! Medication interaction checks.
//!
//! A conflict rule flags two known-interacting products co-occurring in the
//! cart. Warnings surface to the shopper but never block checkout. The rule
//! set is a table keyed by unordered product-id pairs so new pairs can be
//! added without redesign; the built-in table carries the single pair the
//! pharmacists have signed off on so far.

use fernhill_core::ProductId;

use crate::cart::CartItem;

/// One interaction rule: an unordered product pair and its warning text.
#[derive(Debug, Clone)]
pub struct InteractionRule {
    first: ProductId,
    second: ProductId,
    warning: String,
}

impl InteractionRule {
    /// Create a rule for a product pair. Order of the pair is irrelevant.
    pub fn new(
        first: impl Into<ProductId>,
        second: impl Into<ProductId>,
        warning: impl Into<String>,
    ) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            warning: warning.into(),
        }
    }

    fn triggered_by(&self, ids: &[&ProductId]) -> bool {
        ids.contains(&&self.first) && ids.contains(&&self.second)
    }
}

/// The active set of interaction rules.
#[derive(Debug, Clone)]
pub struct InteractionTable {
    rules: Vec<InteractionRule>,
}

impl Default for InteractionTable {
    fn default() -> Self {
        Self {
            rules: vec![InteractionRule::new(
                101,
                202,
                "Warning: Medication interaction detected between products 101 and 202.",
            )],
        }
    }
}

impl InteractionTable {
    /// A table with no rules.
    #[must_use]
    pub const fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule to the table.
    pub fn add_rule(&mut self, rule: InteractionRule) {
        self.rules.push(rule);
    }

    /// Warnings for every rule whose pair co-occurs in `items`.
    ///
    /// Warnings are advisory; checkout is never blocked by an interaction.
    #[must_use]
    pub fn check(&self, items: &[CartItem]) -> Vec<String> {
        let ids: Vec<&ProductId> = items.iter().map(|item| &item.product().id).collect();
        self.rules
            .iter()
            .filter(|rule| rule.triggered_by(&ids))
            .map(|rule| rule.warning.clone())
            .collect()
    }
}

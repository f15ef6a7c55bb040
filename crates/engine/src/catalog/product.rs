//! Product records and their create/update inputs.

use chrono::{DateTime, Utc};
use fernhill_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A purchasable product.
///
/// The cart stores a denormalized snapshot of this record at add-time, so
/// catalog edits never retroactively reprice cart lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque identifier; integer and string schemes coexist.
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price; non-negative.
    pub price: Decimal,
    /// Units on hand.
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub category: String,
    /// Optional image reference (URL or asset path).
    #[serde(default)]
    pub image: Option<String>,
    /// Whether purchase requires a valid prescription.
    #[serde(default)]
    pub requires_prescription: bool,
    /// Creation timestamp; set by whichever source created the record.
    /// The remote source orders listings newest-first by this field.
    #[serde(default, alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for creating a product. The identifier is assigned by the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub requires_prescription: bool,
}

impl ProductDraft {
    /// Structural validation, one message per offending field in field order.
    ///
    /// # Errors
    ///
    /// Returns the full list of messages when any field is invalid.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Product name is required".to_string());
        }
        if self.price <= Decimal::ZERO {
            errors.push("Valid price is required".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Materialize the draft into a product with an assigned id.
    #[must_use]
    pub fn into_product(self, id: ProductId, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            category: self.category,
            image: self.image,
            requires_prescription: self.requires_prescription,
            created_at: Some(created_at),
        }
    }
}

/// Partial update for a product. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_prescription: Option<bool>,
}

impl ProductPatch {
    /// Apply the set fields onto `product`.
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            product.description.clone_from(description);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(category) = &self.category {
            product.category.clone_from(category);
        }
        if let Some(image) = &self.image {
            product.image = Some(image.clone());
        }
        if let Some(requires_prescription) = self.requires_prescription {
            product.requires_prescription = requires_prescription;
        }
    }

    /// Whether any field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.category.is_none()
            && self.image.is_none()
            && self.requires_prescription.is_none()
    }
}

//! Checkout form validation.
//!
//! Fields are checked in a fixed order so the error list is deterministic:
//! full name, address, city, ZIP code, phone, card number, card expiry, CVV.

use serde::{Deserialize, Serialize};

/// Order form fields collected at checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub phone: String,
    pub card_number: String,
    pub card_expiry: String,
    pub card_cvv: String,
}

/// Outcome of structural form validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    /// One human-readable message per missing/invalid field, in field-check
    /// order.
    pub errors: Vec<String>,
}

fn required(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Validate required order fields.
#[must_use]
pub fn validate_checkout_form(form: &CheckoutForm) -> ValidationReport {
    let checks: [(&str, &str); 8] = [
        (&form.full_name, "Full name is required"),
        (&form.address, "Address is required"),
        (&form.city, "City is required"),
        (&form.zip_code, "ZIP code is required"),
        (&form.phone, "Phone is required"),
        (&form.card_number, "Card number is required"),
        (&form.card_expiry, "Card expiry is required"),
        (&form.card_cvv, "CVV is required"),
    ];

    let errors: Vec<String> = checks
        .into_iter()
        .filter(|(value, _)| !required(value))
        .map(|(_, message)| message.to_string())
        .collect();

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

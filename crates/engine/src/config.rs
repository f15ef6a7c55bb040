//! Engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional (pricing; defaults shown)
//! - `FERNHILL_TAX_RATE` - Flat tax rate applied to the subtotal (default: 0.08)
//! - `FERNHILL_SHIPPING_COST` - Flat shipping fee (default: 5.99)
//! - `FERNHILL_FREE_SHIPPING_THRESHOLD` - Subtotal at which shipping is waived (default: 50)
//! - `FERNHILL_CURRENCY_SYMBOL` - Display currency symbol (default: $)
//!
//! ## Optional (remote catalog; absent means local-only operation)
//! - `FERNHILL_CATALOG_URL` - Base URL of the remote catalog REST service
//! - `FERNHILL_CATALOG_SERVICE_KEY` - Service key for the remote catalog
//!
//! The tax rate is configuration on purpose: observed deployments disagree on
//! the model (a flat 8% tax vs. a 15% VAT), so no rate is hard-coded into
//! the pricing formula.

use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Immutable engine configuration, injected at construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Pricing constants for checkout derivations.
    pub pricing: PricingConfig,
    /// Remote catalog source; `None` means the engine runs local-only.
    pub remote: Option<RemoteCatalogConfig>,
    /// Named slots in the persistent key-value store.
    pub storage: StorageSlots,
}

/// Pricing constants for the checkout orchestrator.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Tax rate applied to the subtotal (e.g., 0.08 for 8%).
    pub tax_rate: Decimal,
    /// Flat shipping fee charged below the free-shipping threshold.
    pub shipping_cost: Decimal,
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Decimal,
    /// Currency symbol for display formatting.
    pub currency_symbol: String,
}

/// Remote catalog service configuration.
///
/// Implements `Debug` manually to redact the service key.
#[derive(Clone)]
pub struct RemoteCatalogConfig {
    /// Base URL of the catalog REST service.
    pub base_url: String,
    /// Service key sent with every request.
    pub service_key: SecretString,
}

impl std::fmt::Debug for RemoteCatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCatalogConfig")
            .field("base_url", &self.base_url)
            .field("service_key", &"[REDACTED]")
            .finish()
    }
}

/// Named slots in the persistent key-value store.
#[derive(Debug, Clone)]
pub struct StorageSlots {
    /// Slot holding the cached product catalog.
    pub catalog: String,
    /// Slot holding the cart.
    pub cart: String,
    /// Slot holding the session user (owned by the auth layer, listed here
    /// so all slot names live in one place).
    pub user: String,
}

impl Default for StorageSlots {
    fn default() -> Self {
        Self {
            catalog: "pharmacy_products".to_string(),
            cart: "pharmacy_cart".to_string(),
            user: "pharmacy_user".to_string(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(8, 2),
            shipping_cost: Decimal::new(599, 2),
            free_shipping_threshold: Decimal::new(50, 0),
            currency_symbol: "$".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present. The
    /// remote catalog is configured only when both its variables are set;
    /// a URL without a key is rejected rather than silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable, or if
    /// the remote configuration is incomplete.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = PricingConfig::default();
        let pricing = PricingConfig {
            tax_rate: get_decimal_or("FERNHILL_TAX_RATE", defaults.tax_rate)?,
            shipping_cost: get_decimal_or("FERNHILL_SHIPPING_COST", defaults.shipping_cost)?,
            free_shipping_threshold: get_decimal_or(
                "FERNHILL_FREE_SHIPPING_THRESHOLD",
                defaults.free_shipping_threshold,
            )?,
            currency_symbol: get_env_or_default("FERNHILL_CURRENCY_SYMBOL", "$"),
        };

        let remote = match get_optional_env("FERNHILL_CATALOG_URL") {
            Some(base_url) => {
                let service_key = get_optional_env("FERNHILL_CATALOG_SERVICE_KEY")
                    .ok_or_else(|| {
                        ConfigError::MissingEnvVar("FERNHILL_CATALOG_SERVICE_KEY".to_string())
                    })?;
                Some(RemoteCatalogConfig {
                    base_url,
                    service_key: SecretString::from(service_key),
                })
            }
            None => None,
        };

        Ok(Self {
            pricing,
            remote,
            storage: StorageSlots::default(),
        })
    }

    /// Local-only configuration with default pricing, for embedding and tests.
    #[must_use]
    pub fn local_only() -> Self {
        Self {
            pricing: PricingConfig::default(),
            remote: None,
            storage: StorageSlots::default(),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a decimal environment variable, falling back to a default when unset.
fn get_decimal_or(key: &str, default: Decimal) -> Result<Decimal, ConfigError> {
    match std::env::var(key) {
        Ok(value) => Decimal::from_str(&value)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

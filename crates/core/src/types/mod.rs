//! Core types for Fernhill.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;

pub use id::{OrderId, ProductId};
pub use price::Money;

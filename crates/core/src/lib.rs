//! Fernhill Core - Shared types library.
//!
//! This crate provides common types used across all Fernhill components:
//! - `engine` - The commerce state engine (catalog, cart, checkout)
//! - page/rendering layers that consume the engine
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Opaque product identifiers, order ids, and money values

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Persistent key-value storage boundary.
//!
//! The engine treats persistence as inject-and-forget: anything that can
//! read and write named JSON values satisfies [`KeyValueStore`]. Two
//! implementations ship with the engine: [`MemoryStore`] for tests and
//! ephemeral sessions, and [`JsonFileStore`] for on-disk persistence across
//! sessions.
//!
//! All operations are synchronous; a caller that reads immediately after a
//! write observes the written value.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur at the storage boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failed (file-backed stores only).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value was not valid JSON for the requested type.
    #[error("Malformed stored value: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A named-slot key-value store holding JSON-encoded values.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn put_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed JSON access on top of any [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    /// Read and deserialize the value under `key`.
    ///
    /// Absence is a normal outcome (`Ok(None)`); a present-but-malformed
    /// value is an error, never silently discarded.
    ///
    /// # Errors
    ///
    /// Returns an error on read failure or malformed JSON.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get_raw(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serialize and write `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error on serialization or write failure.
    fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.put_raw(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

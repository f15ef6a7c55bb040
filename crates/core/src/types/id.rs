//! Opaque identifiers for catalog and order entities.
//!
//! Product identifiers are deliberately *not* a numeric newtype: the catalog
//! is fed by two coexisting schemes (legacy integer ids in seed data, string
//! ids generated by the remote source). [`ProductId`] absorbs both and
//! compares by value, so `101` and `"101"` refer to the same product.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque product identifier.
///
/// Equality and hashing are value-based across representations: an integer id
/// and its decimal string form are the same identifier. No numeric ordering
/// or arithmetic is exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Repr);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Repr {
    Int(i64),
    Text(String),
}

impl ProductId {
    /// Canonical form used for equality and hashing.
    ///
    /// Integer ids and strings that parse as integers normalize to the same
    /// decimal text, so `"007"`, `"7"`, and `7` all compare equal.
    fn canonical(&self) -> Cow<'_, str> {
        match &self.0 {
            Repr::Int(n) => Cow::Owned(n.to_string()),
            Repr::Text(s) => s.parse::<i64>().map_or(Cow::Borrowed(s.as_str()), |n| {
                Cow::Owned(n.to_string())
            }),
        }
    }

    /// Largest numeric id among `ids`, if any id is numeric.
    ///
    /// Used by the local catalog source to mint the next sequential id for
    /// drafts created offline.
    #[must_use]
    pub fn max_numeric<'a, I>(ids: I) -> Option<i64>
    where
        I: IntoIterator<Item = &'a Self>,
    {
        ids.into_iter()
            .filter_map(|id| match &id.0 {
                Repr::Int(n) => Some(*n),
                Repr::Text(s) => s.parse::<i64>().ok(),
            })
            .max()
    }
}

impl PartialEq for ProductId {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for ProductId {}

impl Hash for ProductId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Int(n) => write!(f, "{n}"),
            Repr::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(Repr::Int(id))
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(Repr::Text(id.to_string()))
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(Repr::Text(id))
    }
}

/// A type-safe order identifier, generated at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generate a fresh order id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

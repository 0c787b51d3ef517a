//! Strong type definitions for marketcart.
//!
//! Identifiers are newtypes so a product id can't be confused with any other
//! string flowing through the cart.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A stable product identifier, the unique key of a line item within a cart.
///
/// Ids are compared exactly. An id is only *usable* as a cart key when it is
/// non-empty after trimming whitespace; see [`ProductId::is_usable`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ProductId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id can key a line item.
    ///
    /// Blank ids would never match a later lookup by a real id, so they are
    /// rejected instead of being stored as anonymous entries.
    pub fn is_usable(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Debug for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProductId({:?})", self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for ProductId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProductId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

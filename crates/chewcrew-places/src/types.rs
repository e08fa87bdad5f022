//! Value types exchanged with a place provider.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One selectable option in a room, e.g. `"sushi"`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Category(pub String);

impl Category {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A concrete venue returned for a winning category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Place(pub String);

impl Place {
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Search options a room carries for its provider calls.
///
/// Set once when the room is created from the caller's `address`
/// parameter and passed unchanged to both provider operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOptions {
    /// Free-text location of the group. May be empty.
    pub address: String,
}

impl PlaceOptions {
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

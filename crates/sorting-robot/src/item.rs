//! # Wire Types
//!
//! Values exchanged with the robot: the items it handles and the cubbies it drops them into.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifies a kind of item. Many items may share a code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemCode(pub String);

impl ItemCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for ItemCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl Display for ItemCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single physical item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub code: ItemCode,
    pub label: String,
}

impl Item {
    /// Creates a new Item.
    ///
    /// # Arguments
    /// * `code` - The item code used for routing
    /// * `label` - Human readable name, only used for display
    pub fn new(code: impl Into<ItemCode>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// Identifier of a storage location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CubbyId(pub u64);

impl Display for CubbyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cubby_{}", self.0)
    }
}

/// An item the robot has dropped into a cubby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub item: Item,
    pub cubby: CubbyId,
}

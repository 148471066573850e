//! Customer orders.
//!
//! Orders are immutable once a batch containing them is accepted. The same item code
//! may appear several times in one order; each occurrence is a separate unit that has
//! to be placed.

use serde::{Deserialize, Serialize};
use sorting_robot::{CubbyId, Item, ItemCode};
use std::collections::HashMap;
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<Item>,
}

impl Order {
    /// Creates a new Order.
    ///
    /// # Arguments
    /// * `id` - Caller supplied identifier, unique among live orders
    /// * `items` - Items in the order they were added
    pub fn new(id: impl Into<OrderId>, items: Vec<Item>) -> Self {
        Self {
            id: id.into(),
            items,
        }
    }

    /// Number of units per item code.
    pub fn item_counts(&self) -> HashMap<ItemCode, u32> {
        let mut counts = HashMap::new();
        for item in &self.items {
            *counts.entry(item.code.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// An order together with the cubby it was given for the current batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedOrder {
    pub order: Order,
    pub cubby: CubbyId,
}

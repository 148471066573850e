use crate::model::{Order, PreparedOrder};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Batches. Assigned in acceptance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BatchId(pub u64);

impl Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "batch_{}", self.0)
    }
}

/// The orders submitted together in one `load_orders` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub id: BatchId,
    pub orders: Vec<Order>,
}

impl Batch {
    pub fn new(id: BatchId, orders: Vec<Order>) -> Self {
        Self { id, orders }
    }

    /// Total number of item units across all orders.
    pub fn item_count(&self) -> usize {
        self.orders.iter().map(|order| order.items.len()).sum()
    }
}

/// What a finished batch looks like: every order with its cubby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: BatchId,
    pub prepared: Vec<PreparedOrder>,
    pub placed_items: usize,
}

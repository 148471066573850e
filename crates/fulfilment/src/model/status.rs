//! Order lifecycle states.
//!
//! ```text
//! PENDING ──► READY
//!    │
//!    └──────► FAILED
//! ```
//!
//! `Ready` and `Failed` are terminal. Nothing ever moves back to `Pending`.

use crate::model::{BatchId, Order, OrderId};
use serde::{Deserialize, Serialize};
use sorting_robot::{CubbyId, Item};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    /// Accepted, not every item placed yet.
    Pending,
    /// Every item is in the cubby.
    Ready,
    /// The batch could not be completed.
    Failed { reason: String },
}

impl OrderState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderState::Pending)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, OrderState::Ready)
    }
}

impl Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderState::Pending => f.write_str("PENDING"),
            OrderState::Ready => f.write_str("READY"),
            OrderState::Failed { .. } => f.write_str("FAILED"),
        }
    }
}

/// The externally visible record for one live order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfilmentStatus {
    pub order_id: OrderId,
    /// The order's items as submitted.
    pub items: Vec<Item>,
    pub batch_id: BatchId,
    /// `None` until the batch worker has allocated cubbies for the batch.
    pub cubby: Option<CubbyId>,
    pub state: OrderState,
}

impl FulfilmentStatus {
    pub fn pending(order: &Order, batch_id: BatchId) -> Self {
        Self {
            order_id: order.id.clone(),
            items: order.items.clone(),
            batch_id,
            cubby: None,
            state: OrderState::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!OrderState::Pending.is_terminal());
        assert!(OrderState::Ready.is_terminal());
        assert!(OrderState::Failed {
            reason: "robot disconnected".into()
        }
        .is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderState::Pending.to_string(), "PENDING");
        assert_eq!(OrderState::Ready.to_string(), "READY");
        assert_eq!(
            OrderState::Failed {
                reason: "x".into()
            }
            .to_string(),
            "FAILED"
        );
    }
}

//! Error types for the completion tracker.

use crate::model::{ItemCode, OrderId, OrderState};
use thiserror::Error;

/// Errors that can occur during tracker operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerError {
    /// The order is not live.
    #[error("order not found: {0}")]
    NotFound(OrderId),

    /// An order with the same id is still live.
    #[error("order already tracked: {0}")]
    AlreadyTracked(OrderId),

    /// The order does not contain this code, or every unit of it is already placed.
    #[error("order {order_id} does not expect another {code}")]
    UnexpectedItem { order_id: OrderId, code: ItemCode },

    /// The order already reached a terminal state.
    #[error("order {order_id} is no longer pending ({state})")]
    NotPending { order_id: OrderId, state: OrderState },

    /// Only `READY` orders can be collected.
    #[error("order {order_id} is not ready ({state})")]
    NotReady { order_id: OrderId, state: OrderState },

    #[error("tracker closed")]
    ActorClosed,

    #[error("tracker dropped response channel")]
    ActorDropped,
}

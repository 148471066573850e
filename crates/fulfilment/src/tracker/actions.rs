//! Requests understood by the tracker actor.
//!
//! Each variant maps to one method on [`TrackerClient`](crate::clients::TrackerClient)
//! and carries the one-shot channel the actor replies on.

use super::TrackerError;
use crate::model::{BatchId, CubbyId, FulfilmentStatus, ItemCode, Order, OrderId};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the tracker.
pub type Response<T> = oneshot::Sender<Result<T, TrackerError>>;

#[derive(Debug)]
pub enum TrackerRequest {
    /// Registers every order as `PENDING`. All or nothing.
    Initialize {
        batch_id: BatchId,
        orders: Vec<Order>,
        respond_to: Response<()>,
    },
    AssignCubby {
        order_id: OrderId,
        cubby: CubbyId,
        respond_to: Response<()>,
    },
    /// Replies with the number of units the order still waits for.
    RecordPlacement {
        order_id: OrderId,
        code: ItemCode,
        respond_to: Response<u32>,
    },
    /// Replies `true` only for the call that moved the order to `READY`.
    MaybeComplete {
        order_id: OrderId,
        respond_to: Response<bool>,
    },
    /// Replies with how many orders moved to `FAILED`.
    Fail {
        order_ids: Vec<OrderId>,
        reason: String,
        respond_to: Response<usize>,
    },
    Get {
        order_id: OrderId,
        respond_to: Response<Option<FulfilmentStatus>>,
    },
    GetAll {
        respond_to: Response<Vec<FulfilmentStatus>>,
    },
    /// Purges a `READY` order and replies with its last status.
    Remove {
        order_id: OrderId,
        respond_to: Response<FulfilmentStatus>,
    },
    /// Drops orders regardless of state. Used to undo a registration whose batch
    /// was never queued.
    Discard {
        order_ids: Vec<OrderId>,
        respond_to: Response<usize>,
    },
}

//! Top-level error type for the fulfilment service.

use crate::allocator::AllocationError;
use crate::coordinator::CoordinatorError;
use crate::model::{BatchId, OrderId, OrderState};
use crate::routing::RoutingError;
use crate::scheduler::SchedulerError;
use crate::tracker::TrackerError;
use sorting_robot::RobotError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FulfilmentError {
    /// The request was rejected before anything was registered.
    #[error("invalid batch: {0}")]
    InvalidBatch(String),

    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("order {order_id} is not ready ({state})")]
    OrderNotReady { order_id: OrderId, state: OrderState },

    #[error("cubby allocation failed: {0}")]
    Allocation(#[from] AllocationError),

    #[error("batch coordination failed: {0}")]
    Coordinator(#[from] CoordinatorError),

    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// The batch was still queued when the service shut down.
    #[error("{0} cancelled before processing")]
    Cancelled(BatchId),

    /// The batch worker went away without reporting an outcome.
    #[error("batch worker gone")]
    WorkerGone,

    #[error("batch task failed: {0}")]
    TaskFailed(String),
}

impl FulfilmentError {
    /// True when the failure means the core's own bookkeeping disagrees with itself,
    /// as opposed to a rejected request or a misbehaving robot.
    pub fn is_internal(&self) -> bool {
        match self {
            FulfilmentError::Allocation(_) | FulfilmentError::TaskFailed(_) => true,
            FulfilmentError::Coordinator(e) => e.is_internal(),
            _ => false,
        }
    }

    /// True when submitting the same batch again could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FulfilmentError::Coordinator(CoordinatorError::Robot(e)) => e.is_retryable(),
            FulfilmentError::Scheduler(SchedulerError::QueueFull(_)) => true,
            _ => false,
        }
    }
}

impl From<RobotError> for FulfilmentError {
    fn from(e: RobotError) -> Self {
        FulfilmentError::Coordinator(CoordinatorError::Robot(e))
    }
}

impl From<RoutingError> for FulfilmentError {
    fn from(e: RoutingError) -> Self {
        FulfilmentError::Coordinator(CoordinatorError::Routing(e))
    }
}

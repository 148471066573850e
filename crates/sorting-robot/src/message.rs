//! # Robot Messages
//!
//! Requests sent from a [`RobotClient`](crate::RobotClient) to the
//! [`SimulatedRobot`](crate::SimulatedRobot) task. Every request carries a one-shot
//! channel for the reply.

use crate::error::RobotError;
use crate::item::{CubbyId, Item, Placement};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the robot actor.
pub type Response<T> = oneshot::Sender<Result<T, RobotError>>;

#[derive(Debug)]
pub enum RobotRequest {
    /// Replies with the bin size after loading.
    LoadItems {
        items: Vec<Item>,
        respond_to: Response<usize>,
    },
    SelectItem {
        respond_to: Response<Item>,
    },
    MoveItem {
        cubby: CubbyId,
        respond_to: Response<()>,
    },
    /// Everything moved so far, oldest first.
    Placements {
        respond_to: Response<Vec<Placement>>,
    },
}

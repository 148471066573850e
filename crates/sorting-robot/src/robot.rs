//! # SortingRobot Trait
//!
//! The seam between the fulfilment core and whatever actually moves items. The core only
//! ever holds an `Arc<dyn SortingRobot>`, so a network client, the [`SimulatedRobot`]
//! actor and the [`MockRobot`] are interchangeable.
//!
//! [`SimulatedRobot`]: crate::SimulatedRobot
//! [`MockRobot`]: crate::mock::MockRobot

use crate::error::RobotError;
use crate::item::{CubbyId, Item};
use async_trait::async_trait;

/// Contract of the item-handling actuator.
#[async_trait]
pub trait SortingRobot: Send + Sync {
    /// Adds items to the robot's bin.
    async fn load_items(&self, items: Vec<Item>) -> Result<(), RobotError>;

    /// Picks one item from the bin and holds it.
    ///
    /// Fails with [`RobotError::NoItemsLoaded`] on an empty bin and with
    /// [`RobotError::AlreadySelected`] while another item is held.
    async fn select_item(&self) -> Result<Item, RobotError>;

    /// Drops the held item into `cubby` and clears the hold.
    ///
    /// Fails with [`RobotError::NoItemSelected`] when nothing is held.
    async fn move_item(&self, cubby: CubbyId) -> Result<(), RobotError>;
}

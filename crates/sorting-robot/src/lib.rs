//! # Sorting Robot
//!
//! The contract between the fulfilment core and the item-handling actuator, plus two
//! in-process implementations of it.
//!
//! The robot holds a bin of [`Item`]s. Each placement is a two-step exchange:
//!
//! 1. [`SortingRobot::select_item`] picks one item out of the bin and holds it.
//! 2. [`SortingRobot::move_item`] drops the held item into a cubby and clears the hold.
//!
//! The robot holds at most one item at a time. Which item gets selected is the robot's
//! business; callers only learn the code of what it picked.
//!
//! ## Implementations
//!
//! - [`SimulatedRobot`] - an actor that owns the bin and the held item and serves
//!   requests sequentially over a channel. Selection is random, driven by a seedable
//!   [`StdRng`](rand::rngs::StdRng) so placement tests are reproducible.
//! - [`mock::MockRobot`] - an expectation queue for driving the caller through exact
//!   success and failure sequences.
//!
//! ```rust
//! use sorting_robot::{CubbyId, Item, SimulatedRobot, SortingRobot};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (robot, client) = SimulatedRobot::with_seed(16, 7);
//!     tokio::spawn(robot.run());
//!
//!     client.load_items(vec![Item::new("1", "Apple")]).await.unwrap();
//!     let item = client.select_item().await.unwrap();
//!     assert_eq!(item.code.as_str(), "1");
//!     client.move_item(CubbyId(3)).await.unwrap();
//! }
//! ```

pub mod actor;
pub mod client;
pub mod error;
pub mod item;
pub mod message;
pub mod mock;
pub mod robot;

pub use actor::SimulatedRobot;
pub use client::RobotClient;
pub use error::RobotError;
pub use item::{CubbyId, Item, ItemCode, Placement};
pub use message::{RobotRequest, Response};
pub use robot::SortingRobot;

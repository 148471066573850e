//! Plain data: orders, batches and the status records the tracker hands out.

pub mod batch;
pub mod order;
pub mod status;

pub use batch::*;
pub use order::*;
pub use status::*;

pub use sorting_robot::{CubbyId, Item, ItemCode};

//! # Completion Tracker
//!
//! Single owner of every live order's [`FulfilmentStatus`](crate::model::FulfilmentStatus).
//! Writers (the batch worker) and readers (status queries) go through the same actor,
//! so readers only ever see committed states.

pub mod actions;
pub mod actor;
pub mod error;

pub use actions::*;
pub use actor::TrackerActor;
pub use error::*;

use crate::clients::TrackerClient;

/// Creates the tracker actor and its client. The caller spawns [`TrackerActor::run`].
pub fn new(buffer_size: usize) -> (TrackerActor, TrackerClient) {
    TrackerActor::new(buffer_size)
}

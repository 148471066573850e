//! Type-safe handles to the crate's actors.

pub mod tracker_client;

pub use tracker_client::TrackerClient;

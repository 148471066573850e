//! # Fulfilment Core
//!
//! Assigns every customer order a cubby, drives the sorting robot until each item sits
//! in its order's cubby, and reports per-order progress.
//!
//! ## Components
//!
//! - [`allocator`]: deterministic, collision-free cubby assignment per batch.
//! - [`routing`]: item code to the FIFO queue of cubbies waiting for it.
//! - [`tracker`]: the actor owning every order's status and outstanding items.
//! - [`scheduler`]: accepts batches and runs them one at a time.
//! - [`coordinator`]: the select, route, move, report loop against the robot.
//! - [`lifecycle`]: [`FulfilmentService`](lifecycle::FulfilmentService), the request surface.
//!
//! ## Testing
//!
//! See [`sorting_robot::mock`] for scripting exact robot replies, and
//! [`sorting_robot::SimulatedRobot::with_seed`] for reproducible end-to-end runs.

pub mod allocator;
pub mod clients;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod pipeline;
pub mod routing;
pub mod scheduler;
pub mod tracker;

pub use error::FulfilmentError;

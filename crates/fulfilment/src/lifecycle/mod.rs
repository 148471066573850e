//! # Service Lifecycle
//!
//! Starting, wiring and stopping the fulfilment core.
//!
//! [`FulfilmentService::new`] spawns two long-lived tasks:
//!
//! 1. the tracker actor, which owns every live order's status, and
//! 2. the batch worker, which owns the robot conversation.
//!
//! The worker talks to the tracker through a cloned [`TrackerClient`](crate::clients::TrackerClient).
//! Shutdown runs in dependency order: the worker drains first, which drops its tracker
//! client, then the service drops its own, the tracker's channel closes and its loop ends.
//!
//! ```rust,ignore
//! let service = FulfilmentService::new(&config, Arc::new(robot_client));
//! let handle = service.load_orders(orders).await?;
//! let report = handle.wait().await?;
//! service.shutdown().await?;
//! ```
//!
//! Logging is set up once per process with [`setup_tracing`].

pub mod fulfilment_system;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use fulfilment_system::*;

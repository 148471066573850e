//! # Robot Coordinator
//!
//! Drives the sorting robot through one batch. For every item unit in the batch:
//!
//! 1. ask the robot to select an item,
//! 2. take the next cubby waiting for that code from the routing table,
//! 3. ask the robot to move the item there,
//! 4. report the placement to the tracker and let it flip the order to `READY`.
//!
//! The robot decides which item comes next, so placements arrive in whatever order it
//! picks. Every robot call is bounded by the configured timeout.
//!
//! A batch that fails between a successful select and the move leaves the robot holding
//! the item. The coordinator remembers it, and when the next batch's select is answered
//! with [`RobotError::AlreadySelected`] it routes the remembered item instead.

use crate::clients::TrackerClient;
use crate::model::{BatchId, CubbyId, Item, ItemCode, OrderId, PreparedOrder};
use crate::routing::{RoutingError, SharedRoutingTable};
use crate::tracker::TrackerError;
use sorting_robot::{RobotError, SortingRobot};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("robot: {0}")]
    Robot(#[from] RobotError),

    #[error("routing: {0}")]
    Routing(#[from] RoutingError),

    /// The routing table produced a cubby no order in the batch owns.
    #[error("{0} is not assigned to any order in the batch")]
    UnknownCubby(CubbyId),

    #[error("tracker: {0}")]
    Tracker(#[from] TrackerError),
}

impl CoordinatorError {
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CoordinatorError::Routing(_) | CoordinatorError::UnknownCubby(_)
        )
    }
}

pub struct RobotCoordinator {
    robot: Arc<dyn SortingRobot>,
    tracker: TrackerClient,
    call_timeout: Duration,
    /// Selected by a failed batch and never moved.
    held: Mutex<Option<Item>>,
}

impl RobotCoordinator {
    pub fn new(robot: Arc<dyn SortingRobot>, tracker: TrackerClient, call_timeout: Duration) -> Self {
        Self {
            robot,
            tracker,
            call_timeout,
            held: Mutex::new(None),
        }
    }

    /// Places every item of `prepared` and returns how many were placed.
    ///
    /// Stops at the first failure. Placements made before it stay recorded.
    #[instrument(skip(self, prepared, routes), fields(orders = prepared.len()))]
    pub async fn run_batch(
        &self,
        batch_id: BatchId,
        prepared: &[PreparedOrder],
        routes: &SharedRoutingTable,
    ) -> Result<usize, CoordinatorError> {
        let owners: HashMap<CubbyId, &OrderId> =
            prepared.iter().map(|p| (p.cubby, &p.order.id)).collect();
        let total: usize = prepared.iter().map(|p| p.order.items.len()).sum();

        for placed in 1..=total {
            let item = self.select().await?;
            let (cubby, order_id) = match Self::route(&item.code, routes, &owners).await {
                Ok(routed) => routed,
                Err(e) => {
                    warn!(code = %item.code, error = %e, "Robot left holding an unrouted item");
                    *self.held.lock().await = Some(item);
                    return Err(e);
                }
            };

            self.bounded(self.robot.move_item(cubby)).await?;

            let outstanding = self
                .tracker
                .record_placement(order_id.clone(), item.code.clone())
                .await?;
            debug!(%order_id, code = %item.code, %cubby, outstanding, placed, total, "Item placed");

            if self.tracker.maybe_complete(order_id.clone()).await? {
                info!(%batch_id, %order_id, %cubby, "Order ready for collection");
            }
        }

        Ok(total)
    }

    /// The item the robot now holds: a fresh selection, or the one left over from a
    /// failed batch.
    async fn select(&self) -> Result<Item, RobotError> {
        match self.bounded(self.robot.select_item()).await {
            Ok(item) => {
                self.held.lock().await.take();
                Ok(item)
            }
            Err(RobotError::AlreadySelected) => match self.held.lock().await.take() {
                Some(item) => {
                    info!(code = %item.code, "Resuming item held since an earlier batch");
                    Ok(item)
                }
                None => Err(RobotError::AlreadySelected),
            },
            Err(e) => Err(e),
        }
    }

    async fn route<'a>(
        code: &ItemCode,
        routes: &SharedRoutingTable,
        owners: &HashMap<CubbyId, &'a OrderId>,
    ) -> Result<(CubbyId, &'a OrderId), CoordinatorError> {
        let cubby = routes.lock().await.pop_next(code)?;
        let order_id = owners
            .get(&cubby)
            .copied()
            .ok_or(CoordinatorError::UnknownCubby(cubby))?;
        Ok((cubby, order_id))
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, RobotError>>,
    ) -> Result<T, RobotError> {
        timeout(self.call_timeout, call)
            .await
            .map_err(|_| RobotError::Timeout(self.call_timeout))?
    }
}

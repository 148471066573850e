use crate::allocator::CubbyAllocator;
use crate::clients::TrackerClient;
use crate::config::FulfilmentConfig;
use crate::coordinator::RobotCoordinator;
use crate::error::FulfilmentError;
use crate::model::{Batch, BatchId, CubbyId, FulfilmentStatus, ItemCode, Order, OrderId};
use crate::pipeline::FulfilmentPipeline;
use crate::routing::{RoutingTable, SharedRoutingTable};
use crate::scheduler::{BatchHandle, BatchScheduler, SchedulerError};
use crate::tracker::{self, TrackerError};
use sorting_robot::SortingRobot;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// The fulfilment core's request surface.
///
/// Every method can be called concurrently from any number of tasks.
pub struct FulfilmentService {
    tracker: TrackerClient,
    scheduler: BatchScheduler,
    routes: SharedRoutingTable,
    next_batch_id: AtomicU64,
    /// Tracker actor task, awaited on shutdown
    tracker_handle: JoinHandle<()>,
}

impl FulfilmentService {
    /// Spawns the tracker actor and the batch worker.
    ///
    /// Must be called from within a tokio runtime. `config` is used as given; run
    /// [`validate_config`](crate::config::validate_config) first for untrusted input.
    pub fn new(config: &FulfilmentConfig, robot: Arc<dyn SortingRobot>) -> Self {
        let (tracker_actor, tracker) = tracker::new(config.scheduler.tracker_buffer.max(1));
        let tracker_handle = tokio::spawn(tracker_actor.run());

        let routes: SharedRoutingTable = Arc::new(Mutex::new(RoutingTable::default()));
        let coordinator =
            RobotCoordinator::new(robot, tracker.clone(), config.robot.call_timeout());
        let pipeline = FulfilmentPipeline::new(
            CubbyAllocator::from_config(&config.allocator),
            tracker.clone(),
            coordinator,
            routes.clone(),
        );
        let scheduler = BatchScheduler::spawn(Arc::new(pipeline), &config.scheduler);

        info!(
            cubby_space = config.allocator.cubby_space,
            max_queued_batches = config.scheduler.max_queued_batches,
            call_timeout_ms = config.robot.call_timeout_ms,
            "Fulfilment service started"
        );

        Self {
            tracker,
            scheduler,
            routes,
            next_batch_id: AtomicU64::new(1),
            tracker_handle,
        }
    }

    /// Accepts a batch of orders.
    ///
    /// Returns once every order is registered as `PENDING` and the batch is queued; the
    /// returned handle resolves when the batch has been processed. Nothing is registered
    /// when the batch is rejected.
    #[instrument(skip(self, orders), fields(count = orders.len()))]
    pub async fn load_orders(&self, orders: Vec<Order>) -> Result<BatchHandle, FulfilmentError> {
        validate_batch(&orders)?;
        if !self.scheduler.is_accepting() {
            return Err(SchedulerError::ShuttingDown.into());
        }

        let batch_id = BatchId(self.next_batch_id.fetch_add(1, Ordering::SeqCst));
        let order_ids: Vec<OrderId> = orders.iter().map(|o| o.id.clone()).collect();

        self.tracker
            .initialize_batch(batch_id, orders.clone())
            .await
            .map_err(|e| match e {
                TrackerError::AlreadyTracked(id) => {
                    FulfilmentError::InvalidBatch(format!("order {} is already live", id))
                }
                other => other.into(),
            })?;

        match self.scheduler.submit(Batch::new(batch_id, orders)) {
            Ok(handle) => {
                info!(%batch_id, orders = order_ids.len(), "Batch accepted");
                Ok(handle)
            }
            Err(e) => {
                warn!(%batch_id, error = %e, "Batch refused, discarding its orders");
                self.tracker.discard(order_ids).await?;
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self, order_id))]
    pub async fn get_order_status_by_id(
        &self,
        order_id: impl Into<OrderId>,
    ) -> Result<FulfilmentStatus, FulfilmentError> {
        let order_id = order_id.into();
        debug!(%order_id, "get_order_status_by_id called");
        self.tracker
            .get(order_id.clone())
            .await?
            .ok_or(FulfilmentError::OrderNotFound(order_id))
    }

    /// Every live order, sorted by batch then order id.
    #[instrument(skip(self))]
    pub async fn get_all_orders_status(&self) -> Result<Vec<FulfilmentStatus>, FulfilmentError> {
        Ok(self.tracker.get_all().await?)
    }

    /// Confirms a `READY` order was collected and forgets it. Returns its last status.
    #[instrument(skip(self, order_id))]
    pub async fn mark_fulfilled(
        &self,
        order_id: impl Into<OrderId>,
    ) -> Result<FulfilmentStatus, FulfilmentError> {
        let order_id = order_id.into();
        let status = self
            .tracker
            .remove(order_id)
            .await
            .map_err(|e| match e {
                TrackerError::NotFound(id) => FulfilmentError::OrderNotFound(id),
                TrackerError::NotReady { order_id, state } => {
                    FulfilmentError::OrderNotReady { order_id, state }
                }
                other => other.into(),
            })?;
        info!(order_id = %status.order_id, cubby = ?status.cubby, "Order fulfilled");
        Ok(status)
    }

    /// Cubbies still waiting for each code in the batch in flight. Empty between batches.
    pub async fn routing_snapshot(&self) -> BTreeMap<ItemCode, Vec<CubbyId>> {
        self.routes.lock().await.snapshot()
    }

    /// Batches accepted but not started yet.
    pub fn queued_batches(&self) -> usize {
        self.scheduler.queued()
    }

    /// Gracefully shuts down the service.
    ///
    /// The batch in flight finishes, queued batches are cancelled and their orders
    /// marked failed, then the tracker stops. Live statuses are lost.
    pub async fn shutdown(self) -> Result<(), FulfilmentError> {
        info!("Shutting down fulfilment service...");

        self.scheduler.shutdown().await;
        drop(self.scheduler);
        drop(self.tracker);

        if let Err(e) = self.tracker_handle.await {
            error!("Tracker task failed: {:?}", e);
            return Err(FulfilmentError::TaskFailed(e.to_string()));
        }

        info!("Fulfilment service shutdown complete.");
        Ok(())
    }
}

fn validate_batch(orders: &[Order]) -> Result<(), FulfilmentError> {
    if orders.is_empty() {
        return Err(FulfilmentError::InvalidBatch(
            "batch contains no orders".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(orders.len());
    for order in orders {
        if order.id.as_str().is_empty() {
            return Err(FulfilmentError::InvalidBatch(
                "order id cannot be empty".to_string(),
            ));
        }
        if !seen.insert(&order.id) {
            return Err(FulfilmentError::InvalidBatch(format!(
                "order {} appears twice",
                order.id
            )));
        }
    }
    Ok(())
}

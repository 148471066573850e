//! What the batch worker does with one batch.
//!
//! [`BatchProcessor`] is the seam between the scheduler and the fulfilment steps, so the
//! scheduler's queueing and shutdown behaviour can be tested without a robot.

use crate::allocator::CubbyAllocator;
use crate::clients::TrackerClient;
use crate::coordinator::RobotCoordinator;
use crate::error::FulfilmentError;
use crate::model::{Batch, BatchReport, OrderId};
use crate::routing::{RoutingTable, SharedRoutingTable};
use async_trait::async_trait;
use tracing::{info, instrument, warn};

#[async_trait]
pub trait BatchProcessor: Send + Sync + 'static {
    /// Runs one batch to completion.
    async fn process(&self, batch: &Batch) -> Result<BatchReport, FulfilmentError>;

    /// Called for a batch that failed or was never processed.
    async fn abandon(&self, batch: &Batch, error: &FulfilmentError);
}

/// Allocation, routing and robot coordination for one batch at a time.
pub struct FulfilmentPipeline {
    allocator: CubbyAllocator,
    tracker: TrackerClient,
    coordinator: RobotCoordinator,
    routes: SharedRoutingTable,
}

impl FulfilmentPipeline {
    pub fn new(
        allocator: CubbyAllocator,
        tracker: TrackerClient,
        coordinator: RobotCoordinator,
        routes: SharedRoutingTable,
    ) -> Self {
        Self {
            allocator,
            tracker,
            coordinator,
            routes,
        }
    }
}

#[async_trait]
impl BatchProcessor for FulfilmentPipeline {
    #[instrument(name = "batch", skip(self, batch), fields(batch_id = %batch.id, orders = batch.orders.len()))]
    async fn process(&self, batch: &Batch) -> Result<BatchReport, FulfilmentError> {
        let prepared = self.allocator.allocate_batch(&batch.orders)?;

        // Cubbies are published before any item moves, so a status reader never sees
        // an order with placements but no cubby.
        for entry in &prepared {
            self.tracker
                .assign_cubby(entry.order.id.clone(), entry.cubby)
                .await?;
        }
        for entry in prepared.iter().filter(|p| p.order.items.is_empty()) {
            self.tracker.maybe_complete(entry.order.id.clone()).await?;
        }

        *self.routes.lock().await = RoutingTable::build(&prepared);
        let outcome = self
            .coordinator
            .run_batch(batch.id, &prepared, &self.routes)
            .await;
        self.routes.lock().await.clear();

        let placed_items = outcome?;
        info!(placed_items, "Batch complete");
        Ok(BatchReport {
            batch_id: batch.id,
            prepared,
            placed_items,
        })
    }

    async fn abandon(&self, batch: &Batch, error: &FulfilmentError) {
        let order_ids: Vec<OrderId> = batch.orders.iter().map(|o| o.id.clone()).collect();
        match self.tracker.fail(order_ids, error.to_string()).await {
            Ok(failed) => warn!(batch_id = %batch.id, failed, error = %error, "Batch abandoned"),
            Err(e) => warn!(batch_id = %batch.id, error = %e, "Could not mark batch failed"),
        }
    }
}

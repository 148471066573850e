//! # Tracker Actor
//!
//! Owns the status table and the per-order outstanding item counts. Requests are
//! handled strictly one after another, so a reader never observes a half-applied
//! change: a cubby is always visible before the `READY` it enables, and an order's
//! counts and state always agree.

use super::actions::TrackerRequest;
use super::TrackerError;
use crate::clients::TrackerClient;
use crate::model::{
    BatchId, CubbyId, FulfilmentStatus, ItemCode, Order, OrderId, OrderState,
};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Live bookkeeping for one order.
#[derive(Debug, Clone)]
struct TrackedOrder {
    status: FulfilmentStatus,
    /// Units of each code not placed yet. A count, not a flag: an order with two
    /// items of the same code needs two placements.
    remaining: HashMap<ItemCode, u32>,
}

impl TrackedOrder {
    fn new(batch_id: BatchId, order: &Order) -> Self {
        Self {
            status: FulfilmentStatus::pending(order, batch_id),
            remaining: order.item_counts(),
        }
    }

    fn outstanding(&self) -> u32 {
        self.remaining.values().sum()
    }
}

/// The completion tracker.
///
/// Create with [`crate::tracker::new`], spawn [`TrackerActor::run`], talk to it through
/// the returned [`TrackerClient`]. The loop ends once every client is dropped.
pub struct TrackerActor {
    receiver: mpsc::Receiver<TrackerRequest>,
    orders: HashMap<OrderId, TrackedOrder>,
}

impl TrackerActor {
    pub fn new(buffer_size: usize) -> (Self, TrackerClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            orders: HashMap::new(),
        };
        (actor, TrackerClient::new(sender))
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    pub async fn run(mut self) {
        info!("Tracker started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                TrackerRequest::Initialize {
                    batch_id,
                    orders,
                    respond_to,
                } => {
                    debug!(%batch_id, count = orders.len(), "Initialize");
                    let _ = respond_to.send(self.initialize(batch_id, orders));
                }
                TrackerRequest::AssignCubby {
                    order_id,
                    cubby,
                    respond_to,
                } => {
                    debug!(%order_id, %cubby, "AssignCubby");
                    let _ = respond_to.send(self.assign_cubby(&order_id, cubby));
                }
                TrackerRequest::RecordPlacement {
                    order_id,
                    code,
                    respond_to,
                } => {
                    debug!(%order_id, %code, "RecordPlacement");
                    let _ = respond_to.send(self.record_placement(&order_id, code));
                }
                TrackerRequest::MaybeComplete {
                    order_id,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.maybe_complete(&order_id));
                }
                TrackerRequest::Fail {
                    order_ids,
                    reason,
                    respond_to,
                } => {
                    let _ = respond_to.send(Ok(self.fail(&order_ids, &reason)));
                }
                TrackerRequest::Get {
                    order_id,
                    respond_to,
                } => {
                    let status = self.orders.get(&order_id).map(|o| o.status.clone());
                    debug!(%order_id, found = status.is_some(), "Get");
                    let _ = respond_to.send(Ok(status));
                }
                TrackerRequest::GetAll { respond_to } => {
                    let _ = respond_to.send(Ok(self.get_all()));
                }
                TrackerRequest::Remove {
                    order_id,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.remove(&order_id));
                }
                TrackerRequest::Discard {
                    order_ids,
                    respond_to,
                } => {
                    let discarded = order_ids
                        .iter()
                        .filter(|id| self.orders.remove(*id).is_some())
                        .count();
                    info!(discarded, size = self.orders.len(), "Discarded");
                    let _ = respond_to.send(Ok(discarded));
                }
            }
        }

        info!(size = self.orders.len(), "Shutdown");
    }

    fn initialize(&mut self, batch_id: BatchId, orders: Vec<Order>) -> Result<(), TrackerError> {
        // A failed order can be resubmitted under the same id; anything else is still live.
        let live = orders.iter().find(|o| {
            self.orders
                .get(&o.id)
                .is_some_and(|t| !matches!(t.status.state, OrderState::Failed { .. }))
        });
        if let Some(live) = live {
            warn!(%batch_id, order_id = %live.id, "Order already tracked");
            return Err(TrackerError::AlreadyTracked(live.id.clone()));
        }
        for order in &orders {
            self.orders
                .insert(order.id.clone(), TrackedOrder::new(batch_id, order));
        }
        info!(%batch_id, added = orders.len(), size = self.orders.len(), "Registered");
        Ok(())
    }

    fn assign_cubby(&mut self, order_id: &OrderId, cubby: CubbyId) -> Result<(), TrackerError> {
        let tracked = self.tracked_mut(order_id)?;
        tracked.status.cubby = Some(cubby);
        Ok(())
    }

    fn record_placement(&mut self, order_id: &OrderId, code: ItemCode) -> Result<u32, TrackerError> {
        let tracked = self.tracked_mut(order_id)?;
        if tracked.status.state.is_terminal() {
            warn!(%order_id, state = %tracked.status.state, "Placement for finished order");
            return Err(TrackerError::NotPending {
                order_id: order_id.clone(),
                state: tracked.status.state.clone(),
            });
        }
        match tracked.remaining.get_mut(&code) {
            Some(left) if *left > 0 => {
                *left -= 1;
                Ok(tracked.outstanding())
            }
            _ => {
                warn!(%order_id, %code, "Unexpected placement");
                Err(TrackerError::UnexpectedItem {
                    order_id: order_id.clone(),
                    code,
                })
            }
        }
    }

    fn maybe_complete(&mut self, order_id: &OrderId) -> Result<bool, TrackerError> {
        let tracked = self.tracked_mut(order_id)?;
        let ready = tracked.status.state == OrderState::Pending
            && tracked.status.cubby.is_some()
            && tracked.outstanding() == 0;
        if ready {
            tracked.status.state = OrderState::Ready;
            info!(%order_id, cubby = ?tracked.status.cubby, "Order ready");
        }
        Ok(ready)
    }

    fn fail(&mut self, order_ids: &[OrderId], reason: &str) -> usize {
        let mut failed = 0;
        for order_id in order_ids {
            match self.orders.get_mut(order_id) {
                Some(tracked) if tracked.status.state == OrderState::Pending => {
                    tracked.status.state = OrderState::Failed {
                        reason: reason.to_string(),
                    };
                    failed += 1;
                }
                Some(_) => {}
                None => debug!(%order_id, "Fail for unknown order"),
            }
        }
        warn!(failed, reason, "Orders failed");
        failed
    }

    fn get_all(&self) -> Vec<FulfilmentStatus> {
        let mut all: Vec<FulfilmentStatus> =
            self.orders.values().map(|o| o.status.clone()).collect();
        all.sort_by(|a, b| (a.batch_id, &a.order_id).cmp(&(b.batch_id, &b.order_id)));
        all
    }

    fn remove(&mut self, order_id: &OrderId) -> Result<FulfilmentStatus, TrackerError> {
        let state = self.tracked_mut(order_id)?.status.state.clone();
        if !state.is_ready() {
            warn!(%order_id, %state, "Collect before ready");
            return Err(TrackerError::NotReady {
                order_id: order_id.clone(),
                state,
            });
        }
        let tracked = self
            .orders
            .remove(order_id)
            .ok_or_else(|| TrackerError::NotFound(order_id.clone()))?;
        info!(%order_id, size = self.orders.len(), "Collected");
        Ok(tracked.status)
    }

    fn tracked_mut(&mut self, order_id: &OrderId) -> Result<&mut TrackedOrder, TrackerError> {
        self.orders.get_mut(order_id).ok_or_else(|| {
            warn!(%order_id, "Not found");
            TrackerError::NotFound(order_id.clone())
        })
    }
}

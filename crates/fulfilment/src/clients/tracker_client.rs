//! # Tracker Client
//!
//! Provides a high-level API for interacting with the completion tracker actor.
//! Each method sends one [`TrackerRequest`] and awaits the actor's reply.

use crate::model::{BatchId, CubbyId, FulfilmentStatus, ItemCode, Order, OrderId};
use crate::tracker::{Response, TrackerError, TrackerRequest};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Client for interacting with the tracker actor.
#[derive(Clone)]
pub struct TrackerClient {
    sender: mpsc::Sender<TrackerRequest>,
}

impl TrackerClient {
    pub fn new(sender: mpsc::Sender<TrackerRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> TrackerRequest,
    ) -> Result<T, TrackerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| TrackerError::ActorClosed)?;
        response.await.map_err(|_| TrackerError::ActorDropped)?
    }

    /// Registers a single order as `PENDING`.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn initialize(&self, batch_id: BatchId, order: Order) -> Result<(), TrackerError> {
        self.initialize_batch(batch_id, vec![order]).await
    }

    /// Registers every order of a batch. Nothing is registered if any id is already live.
    #[instrument(skip(self, orders), fields(count = orders.len()))]
    pub async fn initialize_batch(
        &self,
        batch_id: BatchId,
        orders: Vec<Order>,
    ) -> Result<(), TrackerError> {
        debug!("initialize_batch called");
        self.request(|respond_to| TrackerRequest::Initialize {
            batch_id,
            orders,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn assign_cubby(&self, order_id: OrderId, cubby: CubbyId) -> Result<(), TrackerError> {
        self.request(|respond_to| TrackerRequest::AssignCubby {
            order_id,
            cubby,
            respond_to,
        })
        .await
    }

    /// Counts one unit of `code` as placed. Returns the units the order still waits for.
    #[instrument(skip(self))]
    pub async fn record_placement(
        &self,
        order_id: OrderId,
        code: ItemCode,
    ) -> Result<u32, TrackerError> {
        self.request(|respond_to| TrackerRequest::RecordPlacement {
            order_id,
            code,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn maybe_complete(&self, order_id: OrderId) -> Result<bool, TrackerError> {
        self.request(|respond_to| TrackerRequest::MaybeComplete {
            order_id,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self, order_ids), fields(count = order_ids.len()))]
    pub async fn fail(&self, order_ids: Vec<OrderId>, reason: String) -> Result<usize, TrackerError> {
        self.request(|respond_to| TrackerRequest::Fail {
            order_ids,
            reason,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, order_id: OrderId) -> Result<Option<FulfilmentStatus>, TrackerError> {
        self.request(|respond_to| TrackerRequest::Get {
            order_id,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<FulfilmentStatus>, TrackerError> {
        self.request(|respond_to| TrackerRequest::GetAll { respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, order_id: OrderId) -> Result<FulfilmentStatus, TrackerError> {
        self.request(|respond_to| TrackerRequest::Remove {
            order_id,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self, order_ids), fields(count = order_ids.len()))]
    pub async fn discard(&self, order_ids: Vec<OrderId>) -> Result<usize, TrackerError> {
        self.request(|respond_to| TrackerRequest::Discard {
            order_ids,
            respond_to,
        })
        .await
    }
}

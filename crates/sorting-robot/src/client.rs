//! # Robot Client
//!
//! Cloneable handle to a running [`SimulatedRobot`](crate::SimulatedRobot).

use crate::error::RobotError;
use crate::item::{CubbyId, Item, Placement};
use crate::message::{RobotRequest, Response};
use crate::robot::SortingRobot;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Sends requests to the robot actor and waits for its replies.
///
/// Holds only the channel sender, so cloning is cheap. A dropped robot task shows up
/// as [`RobotError::Disconnected`].
#[derive(Clone)]
pub struct RobotClient {
    sender: mpsc::Sender<RobotRequest>,
}

impl RobotClient {
    pub fn new(sender: mpsc::Sender<RobotRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> RobotRequest,
    ) -> Result<T, RobotError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| RobotError::Disconnected)?;
        response.await.map_err(|_| RobotError::Disconnected)?
    }

    /// Every placement the robot has made so far, oldest first.
    #[instrument(skip(self))]
    pub async fn placements(&self) -> Result<Vec<Placement>, RobotError> {
        self.request(|respond_to| RobotRequest::Placements { respond_to })
            .await
    }
}

#[async_trait]
impl SortingRobot for RobotClient {
    #[instrument(skip(self, items), fields(count = items.len()))]
    async fn load_items(&self, items: Vec<Item>) -> Result<(), RobotError> {
        let size = self
            .request(|respond_to| RobotRequest::LoadItems { items, respond_to })
            .await?;
        debug!(size, "Bin loaded");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn select_item(&self) -> Result<Item, RobotError> {
        self.request(|respond_to| RobotRequest::SelectItem { respond_to })
            .await
    }

    #[instrument(skip(self))]
    async fn move_item(&self, cubby: CubbyId) -> Result<(), RobotError> {
        self.request(|respond_to| RobotRequest::MoveItem { cubby, respond_to })
            .await
    }
}

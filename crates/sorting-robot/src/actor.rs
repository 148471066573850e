//! # Simulated Robot
//!
//! An in-process robot that behaves like the physical one as far as the protocol goes.
//! It owns the bin and the held item and processes requests one at a time, so two
//! concurrent `select_item` calls can never both succeed.

use crate::client::RobotClient;
use crate::error::RobotError;
use crate::item::{CubbyId, Item, Placement};
use crate::message::RobotRequest;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The robot actor.
///
/// Create it with [`SimulatedRobot::new`] (random selection seeded from OS entropy) or
/// [`SimulatedRobot::with_seed`] (reproducible selection order), then spawn
/// [`SimulatedRobot::run`]. The loop ends when every [`RobotClient`] is dropped.
pub struct SimulatedRobot {
    receiver: mpsc::Receiver<RobotRequest>,
    bin: Vec<Item>,
    selected: Option<Item>,
    placements: Vec<Placement>,
    rng: StdRng,
}

impl SimulatedRobot {
    /// Creates a robot whose selections are not reproducible.
    pub fn new(buffer_size: usize) -> (Self, RobotClient) {
        Self::with_rng(buffer_size, StdRng::from_entropy())
    }

    /// Creates a robot whose selection order is fully determined by `seed` and the
    /// order items were loaded in.
    pub fn with_seed(buffer_size: usize, seed: u64) -> (Self, RobotClient) {
        Self::with_rng(buffer_size, StdRng::seed_from_u64(seed))
    }

    /// Seeded when `seed` is set, entropy otherwise.
    pub fn from_seed(buffer_size: usize, seed: Option<u64>) -> (Self, RobotClient) {
        match seed {
            Some(seed) => Self::with_seed(buffer_size, seed),
            None => Self::new(buffer_size),
        }
    }

    fn with_rng(buffer_size: usize, rng: StdRng) -> (Self, RobotClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let robot = Self {
            receiver,
            bin: Vec::new(),
            selected: None,
            placements: Vec::new(),
            rng,
        };
        (robot, RobotClient::new(sender))
    }

    /// Runs the robot's event loop until the channel closes.
    pub async fn run(mut self) {
        info!("Robot started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                RobotRequest::LoadItems { items, respond_to } => {
                    let added = items.len();
                    self.bin.extend(items);
                    info!(added, size = self.bin.len(), "Loaded items into the bin");
                    let _ = respond_to.send(Ok(self.bin.len()));
                }
                RobotRequest::SelectItem { respond_to } => {
                    let result = self.select();
                    if let Err(e) = &result {
                        warn!(error = %e, "Select failed");
                    }
                    let _ = respond_to.send(result);
                }
                RobotRequest::MoveItem { cubby, respond_to } => {
                    let result = self.place(cubby);
                    if let Err(e) = &result {
                        warn!(%cubby, error = %e, "Move failed");
                    }
                    let _ = respond_to.send(result);
                }
                RobotRequest::Placements { respond_to } => {
                    let _ = respond_to.send(Ok(self.placements.clone()));
                }
            }
        }

        info!(
            size = self.bin.len(),
            placed = self.placements.len(),
            "Shutdown"
        );
    }

    fn select(&mut self) -> Result<Item, RobotError> {
        if self.selected.is_some() {
            return Err(RobotError::AlreadySelected);
        }
        if self.bin.is_empty() {
            return Err(RobotError::NoItemsLoaded);
        }
        let idx = self.rng.gen_range(0..self.bin.len());
        let item = self.bin.remove(idx);
        debug!(position = idx, code = %item.code, left = self.bin.len(), "Selected item");
        self.selected = Some(item.clone());
        Ok(item)
    }

    fn place(&mut self, cubby: CubbyId) -> Result<(), RobotError> {
        let item = self.selected.take().ok_or(RobotError::NoItemSelected)?;
        info!(code = %item.code, %cubby, "Placed item");
        self.placements.push(Placement { item, cubby });
        Ok(())
    }
}

//! # Cubby Allocator
//!
//! Assigns every order in a batch its own cubby by deterministic hashing.
//!
//! For attempt `n = 1, 2, ...` the candidate is
//! `SHA-256(order_id || n as big-endian u32)`, first 8 bytes as a big-endian `u64`,
//! reduced modulo the cubby space. The first candidate not already taken in the batch
//! wins. The same order id against the same set of taken cubbies always lands on the
//! same cubby, which keeps allocation reproducible in tests and logs.
//!
//! Probing stops after `max_attempts` and reports [`AllocationError::Exhausted`]. With the
//! default cubby space this can only happen when the configuration is wrong.

use crate::config::AllocatorConfig;
use crate::model::{CubbyId, Order, OrderId, PreparedOrder};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AllocationError {
    #[error("no free cubby for order {order_id} after {attempts} attempts")]
    Exhausted { order_id: OrderId, attempts: u32 },
}

#[derive(Debug, Clone)]
pub struct CubbyAllocator {
    cubby_space: u64,
    max_attempts: u32,
}

impl CubbyAllocator {
    /// A zero `cubby_space` is treated as one.
    pub fn new(cubby_space: u64, max_attempts: u32) -> Self {
        Self {
            cubby_space: cubby_space.max(1),
            max_attempts,
        }
    }

    pub fn from_config(config: &AllocatorConfig) -> Self {
        Self::new(config.cubby_space, config.max_attempts)
    }

    /// The candidate cubby for `order_id` on attempt number `attempt`.
    pub fn candidate(&self, order_id: &OrderId, attempt: u32) -> CubbyId {
        let digest = Sha256::new()
            .chain_update(order_id.as_str().as_bytes())
            .chain_update(attempt.to_be_bytes())
            .finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        CubbyId(u64::from_be_bytes(head) % self.cubby_space)
    }

    /// First candidate cubby for `order_id` that is not in `used`.
    pub fn assign(
        &self,
        order_id: &OrderId,
        used: &HashSet<CubbyId>,
    ) -> Result<CubbyId, AllocationError> {
        for attempt in 1..=self.max_attempts {
            let cubby = self.candidate(order_id, attempt);
            if !used.contains(&cubby) {
                debug!(%order_id, %cubby, attempt, "Cubby assigned");
                return Ok(cubby);
            }
        }
        Err(AllocationError::Exhausted {
            order_id: order_id.clone(),
            attempts: self.max_attempts,
        })
    }

    /// Assigns pairwise distinct cubbies to every order, in batch order.
    pub fn allocate_batch(&self, orders: &[Order]) -> Result<Vec<PreparedOrder>, AllocationError> {
        let mut used = HashSet::with_capacity(orders.len());
        let mut prepared = Vec::with_capacity(orders.len());
        for order in orders {
            let cubby = self.assign(&order.id, &used)?;
            used.insert(cubby);
            prepared.push(PreparedOrder {
                order: order.clone(),
                cubby,
            });
        }
        Ok(prepared)
    }
}

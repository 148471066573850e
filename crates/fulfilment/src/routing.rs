//! # Item Routing Table
//!
//! Maps each item code to the queue of cubbies still waiting for an item with that code.
//!
//! The table is built once per batch by walking orders in batch order and, inside each
//! order, items in order, pushing the order's cubby onto the code's queue. Popping is
//! FIFO, so the n-th item of code `C` the robot hands over goes to the n-th cubby recorded
//! for `C`.

use crate::model::{CubbyId, ItemCode, PreparedOrder};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RoutingError {
    /// The robot handed over a code nobody in this batch ordered.
    #[error("item {0} is not routed in this batch")]
    NotFound(ItemCode),

    /// The code was ordered, but every unit of it has already been routed.
    #[error("no cubbies left for item {0}")]
    Exhausted(ItemCode),
}

/// The routing table of the batch in flight, shared between the batch worker and
/// diagnostic readers.
pub type SharedRoutingTable = Arc<Mutex<RoutingTable>>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoutingTable {
    queues: HashMap<ItemCode, VecDeque<CubbyId>>,
}

impl RoutingTable {
    pub fn build(prepared: &[PreparedOrder]) -> Self {
        let mut queues: HashMap<ItemCode, VecDeque<CubbyId>> = HashMap::new();
        for entry in prepared {
            for item in &entry.order.items {
                queues
                    .entry(item.code.clone())
                    .or_default()
                    .push_back(entry.cubby);
            }
        }
        Self { queues }
    }

    /// Removes and returns the next cubby waiting for `code`.
    pub fn pop_next(&mut self, code: &ItemCode) -> Result<CubbyId, RoutingError> {
        let queue = self
            .queues
            .get_mut(code)
            .ok_or_else(|| RoutingError::NotFound(code.clone()))?;
        queue
            .pop_front()
            .ok_or_else(|| RoutingError::Exhausted(code.clone()))
    }

    pub fn remaining(&self, code: &ItemCode) -> usize {
        self.queues.get(code).map_or(0, VecDeque::len)
    }

    pub fn total_remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    pub fn is_drained(&self) -> bool {
        self.total_remaining() == 0
    }

    pub fn clear(&mut self) {
        self.queues.clear();
    }

    /// Pending destinations per code, sorted by code.
    pub fn snapshot(&self) -> BTreeMap<ItemCode, Vec<CubbyId>> {
        self.queues
            .iter()
            .map(|(code, queue)| (code.clone(), queue.iter().copied().collect()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, Order};

    fn prepared(id: &str, cubby: u64, codes: &[&str]) -> PreparedOrder {
        PreparedOrder {
            order: Order::new(
                id,
                codes.iter().map(|code| Item::new(*code, "thing")).collect(),
            ),
            cubby: CubbyId(cubby),
        }
    }

    #[test]
    fn test_fifo_across_orders() {
        let mut table = RoutingTable::build(&[
            prepared("o1", 10, &["A", "B"]),
            prepared("o2", 20, &["A"]),
            prepared("o3", 30, &["B", "A"]),
        ]);
        let a = ItemCode::from("A");
        let b = ItemCode::from("B");

        assert_eq!(table.remaining(&a), 3);
        assert_eq!(table.remaining(&b), 2);

        assert_eq!(table.pop_next(&a), Ok(CubbyId(10)));
        assert_eq!(table.pop_next(&a), Ok(CubbyId(20)));
        assert_eq!(table.pop_next(&b), Ok(CubbyId(10)));
        assert_eq!(table.pop_next(&a), Ok(CubbyId(30)));
        assert_eq!(table.pop_next(&b), Ok(CubbyId(30)));
        assert!(table.is_drained());
    }

    #[test]
    fn test_duplicate_codes_in_one_order_get_one_entry_each() {
        let table = RoutingTable::build(&[prepared("o1", 7, &["A", "A", "A"])]);
        assert_eq!(table.remaining(&ItemCode::from("A")), 3);
        assert_eq!(table.total_remaining(), 3);
    }

    #[test]
    fn test_unknown_code_is_not_found() {
        let mut table = RoutingTable::build(&[prepared("o1", 7, &["A"])]);
        let z = ItemCode::from("Z");
        assert_eq!(table.pop_next(&z), Err(RoutingError::NotFound(z.clone())));
    }

    #[test]
    fn test_drained_code_is_exhausted() {
        let mut table = RoutingTable::build(&[prepared("o1", 7, &["A"])]);
        let a = ItemCode::from("A");
        table.pop_next(&a).unwrap();
        assert_eq!(table.pop_next(&a), Err(RoutingError::Exhausted(a.clone())));
    }

    #[test]
    fn test_snapshot_lists_pending_destinations() {
        let table = RoutingTable::build(&[
            prepared("o1", 1, &["B"]),
            prepared("o2", 2, &["A", "B"]),
        ]);
        let snapshot = table.snapshot();
        assert_eq!(snapshot[&ItemCode::from("A")], vec![CubbyId(2)]);
        assert_eq!(snapshot[&ItemCode::from("B")], vec![CubbyId(1), CubbyId(2)]);
    }
}

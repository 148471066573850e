//! # Mock Robot
//!
//! A [`SortingRobot`] that answers from a queue of expectations instead of simulating a
//! bin. Use it when a test needs an exact sequence of robot replies, including failures
//! the simulated robot would never produce on its own (a move rejected right after a
//! successful select, a reply that never arrives in time, a code nobody ordered).
//!
//! ```rust
//! use sorting_robot::mock::MockRobot;
//! use sorting_robot::{CubbyId, Item, RobotError, SortingRobot};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockRobot::new();
//!     mock.expect_select().return_ok(Item::new("1", "Apple"));
//!     mock.expect_move().return_err(RobotError::NoItemSelected);
//!
//!     assert!(mock.select_item().await.is_ok());
//!     assert_eq!(
//!         mock.move_item(CubbyId(4)).await,
//!         Err(RobotError::NoItemSelected)
//!     );
//!     mock.verify();
//! }
//! ```
//!
//! Calls arriving out of the expected order panic, which fails the test that made them.

use crate::error::RobotError;
use crate::item::{CubbyId, Item};
use crate::robot::SortingRobot;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

enum Expectation {
    Load {
        response: Result<(), RobotError>,
    },
    Select {
        delay: Option<Duration>,
        response: Result<Item, RobotError>,
    },
    Move {
        cubby: Option<CubbyId>,
        response: Result<(), RobotError>,
    },
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A robot that replays queued expectations.
#[derive(Clone, Default)]
pub struct MockRobot {
    expectations: Expectations,
    moves: Arc<Mutex<Vec<CubbyId>>>,
}

impl MockRobot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a `load_items` call.
    pub fn expect_load(&mut self) -> LoadExpectationBuilder {
        LoadExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `select_item` call.
    pub fn expect_select(&mut self) -> SelectExpectationBuilder {
        SelectExpectationBuilder {
            delay: None,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `move_item` call to any cubby.
    pub fn expect_move(&mut self) -> MoveExpectationBuilder {
        MoveExpectationBuilder {
            cubby: None,
            expectations: self.expectations.clone(),
        }
    }

    /// Cubbies passed to `move_item`, in call order.
    pub fn moves(&self) -> Vec<CubbyId> {
        lock(&self.moves).clone()
    }

    /// Number of expectations not consumed yet.
    pub fn remaining(&self) -> usize {
        lock(&self.expectations).len()
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let remaining = self.remaining();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn next(&self) -> Option<Expectation> {
        lock(&self.expectations).pop_front()
    }
}

#[async_trait]
impl SortingRobot for MockRobot {
    async fn load_items(&self, _items: Vec<Item>) -> Result<(), RobotError> {
        match self.next() {
            Some(Expectation::Load { response }) => response,
            _ => panic!("Unexpected load_items call"),
        }
    }

    async fn select_item(&self) -> Result<Item, RobotError> {
        match self.next() {
            Some(Expectation::Select { delay, response }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                response
            }
            _ => panic!("Unexpected select_item call"),
        }
    }

    async fn move_item(&self, cubby: CubbyId) -> Result<(), RobotError> {
        match self.next() {
            Some(Expectation::Move {
                cubby: expected,
                response,
            }) => {
                if let Some(expected) = expected {
                    assert_eq!(cubby, expected, "move_item called with the wrong cubby");
                }
                lock(&self.moves).push(cubby);
                response
            }
            _ => panic!("Unexpected move_item call to {}", cubby),
        }
    }
}

/// Builder for `load_items` expectations.
pub struct LoadExpectationBuilder {
    expectations: Expectations,
}

impl LoadExpectationBuilder {
    pub fn return_ok(self) {
        lock(&self.expectations).push_back(Expectation::Load { response: Ok(()) });
    }

    pub fn return_err(self, error: RobotError) {
        lock(&self.expectations).push_back(Expectation::Load {
            response: Err(error),
        });
    }
}

/// Builder for `select_item` expectations.
pub struct SelectExpectationBuilder {
    delay: Option<Duration>,
    expectations: Expectations,
}

impl SelectExpectationBuilder {
    /// Holds the reply back for `delay` before answering.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn return_ok(self, item: Item) {
        lock(&self.expectations).push_back(Expectation::Select {
            delay: self.delay,
            response: Ok(item),
        });
    }

    pub fn return_err(self, error: RobotError) {
        lock(&self.expectations).push_back(Expectation::Select {
            delay: self.delay,
            response: Err(error),
        });
    }
}

/// Builder for `move_item` expectations.
pub struct MoveExpectationBuilder {
    cubby: Option<CubbyId>,
    expectations: Expectations,
}

impl MoveExpectationBuilder {
    /// Requires the move to target exactly `cubby`.
    pub fn to(mut self, cubby: CubbyId) -> Self {
        self.cubby = Some(cubby);
        self
    }

    pub fn return_ok(self) {
        lock(&self.expectations).push_back(Expectation::Move {
            cubby: self.cubby,
            response: Ok(()),
        });
    }

    pub fn return_err(self, error: RobotError) {
        lock(&self.expectations).push_back(Expectation::Move {
            cubby: self.cubby,
            response: Err(error),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order() {
        let mut mock = MockRobot::new();
        mock.expect_load().return_ok();
        mock.expect_select().return_ok(Item::new("7", "Kiwi"));
        mock.expect_move().to(CubbyId(11)).return_ok();

        mock.load_items(vec![Item::new("7", "Kiwi")]).await.unwrap();
        let item = mock.select_item().await.unwrap();
        assert_eq!(item.code.as_str(), "7");
        mock.move_item(CubbyId(11)).await.unwrap();

        assert_eq!(mock.moves(), vec![CubbyId(11)]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_injected_errors() {
        let mut mock = MockRobot::new();
        mock.expect_select().return_err(RobotError::NoItemsLoaded);

        let err = mock.select_item().await.unwrap_err();
        assert_eq!(err, RobotError::NoItemsLoaded);
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_reports_leftovers() {
        let mut mock = MockRobot::new();
        mock.expect_select().return_ok(Item::new("1", "Apple"));
        mock.verify();
    }
}

//! # Robot Errors
//!
//! Everything that can go wrong while talking to the robot. The messages for the
//! protocol errors match what the robot reports on the wire.

use std::time::Duration;

/// Errors returned by a [`SortingRobot`](crate::SortingRobot).
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RobotError {
    /// `select_item` was called while the bin is empty.
    #[error("no items loaded")]
    NoItemsLoaded,

    /// `select_item` was called while an item is still held.
    #[error("an item is already selected")]
    AlreadySelected,

    /// `move_item` was called without a held item.
    #[error("no item is selected")]
    NoItemSelected,

    /// The robot did not answer in time.
    #[error("robot did not respond within {0:?}")]
    Timeout(Duration),

    /// The robot task or connection is gone.
    #[error("robot disconnected")]
    Disconnected,
}

impl RobotError {
    /// Whether repeating the same call later may succeed.
    ///
    /// Protocol errors describe the robot's current state and will repeat until that
    /// state changes, so only transport-level failures count.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RobotError::Timeout(_) | RobotError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_messages() {
        assert_eq!(RobotError::NoItemsLoaded.to_string(), "no items loaded");
        assert_eq!(
            RobotError::AlreadySelected.to_string(),
            "an item is already selected"
        );
        assert_eq!(RobotError::NoItemSelected.to_string(), "no item is selected");
    }

    #[test]
    fn test_retryable() {
        assert!(RobotError::Timeout(Duration::from_millis(10)).is_retryable());
        assert!(RobotError::Disconnected.is_retryable());
        assert!(!RobotError::NoItemsLoaded.is_retryable());
        assert!(!RobotError::NoItemSelected.is_retryable());
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FulfilmentConfig {
    #[serde(default)]
    pub allocator: AllocatorConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub robot: RobotSettings,
}

/// Cubby allocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AllocatorConfig {
    /// Number of distinct cubby ids. Candidates are reduced modulo this value.
    #[serde(default = "default_cubby_space")]
    pub cubby_space: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            cubby_space: default_cubby_space(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_cubby_space() -> u64 {
    u64::MAX
}

fn default_max_attempts() -> u32 {
    64
}

/// Batch queue and tracker mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Batches allowed to wait behind the one in flight. `0` means unbounded.
    #[serde(default)]
    pub max_queued_batches: usize,
    #[serde(default = "default_tracker_buffer")]
    pub tracker_buffer: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_queued_batches: 0,
            tracker_buffer: default_tracker_buffer(),
        }
    }
}

fn default_tracker_buffer() -> usize {
    32
}

/// Talking to the sorting robot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RobotSettings {
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
    /// Seed for the simulated robot's selection order. Entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RobotSettings {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

impl Default for RobotSettings {
    fn default() -> Self {
        Self {
            call_timeout_ms: default_call_timeout_ms(),
            seed: None,
        }
    }
}

fn default_call_timeout_ms() -> u64 {
    5000
}

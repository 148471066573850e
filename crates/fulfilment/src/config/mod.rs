//! Runtime configuration.
//!
//! Values come from an optional TOML file overlaid with `FULFILMENT_` environment
//! variables, nested keys separated by `__`:
//!
//! ```toml
//! [allocator]
//! cubby_space = 1000
//!
//! [robot]
//! call_timeout_ms = 2000
//! seed = 42
//! ```
//!
//! `FULFILMENT_ROBOT__CALL_TIMEOUT_MS=250` overrides the timeout above.

mod loader;
mod types;
mod validate;

pub use loader::*;
pub use types::*;
pub use validate::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

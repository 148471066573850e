//! # Observability & Tracing
//!
//! Compact, span-aware log output filtered through `RUST_LOG`.
//!
//! ```bash
//! RUST_LOG=info cargo run     # batch and order lifecycle
//! RUST_LOG=debug cargo run    # every placement and tracker request
//! ```
//!
//! Batch work runs inside a `batch` span carrying `batch_id`, so every placement line
//! shows which batch it belongs to:
//!
//! ```text
//! INFO Batch started batch_id=batch_1 orders=2 items=3
//! INFO batch:run_batch: Order ready for collection batch_id=batch_1 order_id=o1 cubby=cubby_8414
//! INFO batch: Batch complete placed_items=3
//! ```

/// Installs the global subscriber. Call once, before the service starts.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

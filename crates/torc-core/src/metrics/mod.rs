//! Metrics collection abstraction for phase execution.
//!
//! Backends (prometheus, ...) implement [`MetricsBackend`] and are injected via [`crate::PhaseContext`].
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, PhaseOutcome};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}

//! Prometheus metrics backend for phase execution.
//!
//! [`PrometheusMetrics`] implements [`torc_core::MetricsBackend`]; inject it through
//! [`torc_core::PhaseContext::with_metrics`].
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use torc_core::{PhaseContext, TorcConfig, memory::{MemoryChannel, MemoryScheduler, MemoryStore}};
//! use torc_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let ctx = PhaseContext::new(
//!     Arc::new(MemoryScheduler::new()),
//!     Arc::new(MemoryChannel::new()),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(TorcConfig::default()),
//! )
//! .with_metrics(Arc::new(metrics.clone()));
//!
//! let body = metrics.encode_text()?;
//! # let _ = (ctx, body);
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `torc_phases_started_total{role}` - Counter
//! - `torc_phases_completed_total{role, outcome}` - Counter
//! - `torc_phase_duration_seconds{role}` - Histogram
//! - `torc_submit_errors_total{role, error_kind}` - Counter
//!
//! No HTTP server is provided; serve [`PrometheusMetrics::encode_text`] from the host application.
mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};

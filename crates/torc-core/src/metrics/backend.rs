use std::sync::Arc;

use torc_model::PhaseRole;

/// How a phase invocation ended, for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// Workload reported `OK`.
    Succeeded,
    /// Workload reported `ERROR`, or the wait failed.
    Failed,
    /// Wait deadline elapsed.
    TimedOut,
    /// Wait canceled by the caller.
    Canceled,
}

impl PhaseOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            PhaseOutcome::Succeeded => "succeeded",
            PhaseOutcome::Failed => "failed",
            PhaseOutcome::TimedOut => "timeout",
            PhaseOutcome::Canceled => "canceled",
        }
    }
}

/// Backend metrics collection interface.
///
/// Implementations are injected through [`crate::PhaseContext`] and shared by every phase.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record a job submitted for `role`.
    fn record_phase_started(&self, role: PhaseRole);

    /// Record phase completion with outcome and wall time.
    ///
    /// # Arguments
    /// - `role`: Phase role
    /// - `outcome`: How the phase terminated
    /// - `duration_ms`: Time from submission to completion in milliseconds
    fn record_phase_completed(&self, role: PhaseRole, outcome: PhaseOutcome, duration_ms: u64);

    /// Record a failure before the workload ran (submission, subscription).
    ///
    /// Separate from workload failures, which are `record_phase_completed` with `Failed`.
    fn record_submit_error(&self, role: PhaseRole, error_kind: &str);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;

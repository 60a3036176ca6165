use torc_model::PhaseRole;

use crate::metrics::backend::{MetricsBackend, PhaseOutcome};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_phase_started(&self, _: PhaseRole) {}

    #[inline(always)]
    fn record_phase_completed(&self, _: PhaseRole, _: PhaseOutcome, _: u64) {}

    #[inline(always)]
    fn record_submit_error(&self, _: PhaseRole, _: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_metrics_is_zero_size() {
        assert_eq!(std::mem::size_of::<NoOpMetrics>(), 0);
    }

    #[test]
    fn noop_accepts_every_role() {
        let metrics = NoOpMetrics;
        for role in PhaseRole::ALL {
            metrics.record_phase_started(role);
            metrics.record_phase_completed(role, PhaseOutcome::Succeeded, 100);
            metrics.record_submit_error(role, "scheduler");
        }
    }
}

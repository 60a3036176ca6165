use std::sync::Arc;

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};
use torc_core::{MetricsBackend, PhaseOutcome};
use torc_model::PhaseRole;

/// Prometheus metrics backend.
///
/// ## Label cardinality
/// All labels are bounded:
/// - `role`: "tif", "texam", "tof"
/// - `outcome`: "succeeded", "failed", "timeout", "canceled"
/// - `error_kind`: "scheduler", "config", "model", ...
#[derive(Clone)]
pub struct PrometheusMetrics {
    phases_started: CounterVec,
    phases_completed: CounterVec,
    phase_duration: HistogramVec,
    submit_errors: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let phases_started = CounterVec::new(
            Opts::new("torc_phases_started_total", "Phase jobs submitted"),
            &["role"],
        )?;
        registry.register(Box::new(phases_started.clone()))?;

        let phases_completed = CounterVec::new(
            Opts::new("torc_phases_completed_total", "Phase invocations finished"),
            &["role", "outcome"],
        )?;
        registry.register(Box::new(phases_completed.clone()))?;

        // Phases are cluster jobs: seconds to hours.
        let phase_duration = HistogramVec::new(
            HistogramOpts::new(
                "torc_phase_duration_seconds",
                "Time from job submission to completion message",
            )
            .buckets(vec![1.0, 5.0, 15.0, 60.0, 300.0, 900.0, 3600.0, 14400.0]),
            &["role"],
        )?;
        registry.register(Box::new(phase_duration.clone()))?;

        let submit_errors = CounterVec::new(
            Opts::new("torc_submit_errors_total", "Phase failures before the workload ran"),
            &["role", "error_kind"],
        )?;
        registry.register(Box::new(submit_errors.clone()))?;

        Ok(Self {
            phases_started,
            phases_completed,
            phase_duration,
            submit_errors,
            registry,
        })
    }

    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Text exposition of every registered metric, ready to serve on `/metrics`.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_phase_started(&self, role: PhaseRole) {
        self.phases_started.with_label_values(&[role.prefix()]).inc();
    }

    fn record_phase_completed(&self, role: PhaseRole, outcome: PhaseOutcome, duration_ms: u64) {
        self.phases_completed
            .with_label_values(&[role.prefix(), outcome.as_label()])
            .inc();
        self.phase_duration
            .with_label_values(&[role.prefix()])
            .observe(duration_ms as f64 / 1000.0);
    }

    fn record_submit_error(&self, role: PhaseRole, error_kind: &str) {
        self.submit_errors
            .with_label_values(&[role.prefix(), error_kind])
            .inc();
    }
}

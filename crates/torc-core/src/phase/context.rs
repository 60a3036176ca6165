use std::{fmt, sync::Arc};

use crate::{
    config::TorcConfig,
    metrics::{MetricsHandle, noop_metrics},
    phase::WaitPolicy,
    ports::{CompletionChannel, Scheduler, TaskStore},
};

/// Shared collaborators handed to every phase invocation.
///
/// Cheap to clone; all clients are shared behind `Arc`.
#[derive(Clone)]
pub struct PhaseContext {
    scheduler: Arc<dyn Scheduler>,
    channel: Arc<dyn CompletionChannel>,
    store: Arc<dyn TaskStore>,
    config: Arc<TorcConfig>,
    metrics: MetricsHandle,
    wait: WaitPolicy,
}

impl PhaseContext {
    /// Create a context with no-op metrics and the wait deadline from `config`.
    pub fn new(
        scheduler: Arc<dyn Scheduler>,
        channel: Arc<dyn CompletionChannel>,
        store: Arc<dyn TaskStore>,
        config: Arc<TorcConfig>,
    ) -> Self {
        let wait = WaitPolicy {
            timeout: config.pipeline.wait_timeout(),
            cancel: None,
        };
        Self {
            scheduler,
            channel,
            store,
            config,
            metrics: noop_metrics(),
            wait,
        }
    }

    pub fn scheduler(&self) -> &dyn Scheduler {
        self.scheduler.as_ref()
    }

    pub fn channel(&self) -> &dyn CompletionChannel {
        self.channel.as_ref()
    }

    pub fn store(&self) -> &dyn TaskStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &TorcConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    pub fn wait_policy(&self) -> &WaitPolicy {
        &self.wait
    }

    /// Replace the metrics backend and return updated context.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replace the wait policy and return updated context.
    pub fn with_wait_policy(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }
}

impl fmt::Debug for PhaseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseContext")
            .field("namespace", &self.config.kubernetes.namespace)
            .field("wait", &self.wait)
            .field("metrics", &"<handle>")
            .finish()
    }
}

pub mod config;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod phase;
pub mod ports;

pub use config::TorcConfig;
pub use error::CoreError;
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, PhaseOutcome, noop_metrics};
pub use phase::{
    Phase, PhaseContext, PhaseState, WaitPolicy, execute_phase, record_outcome,
    wait_for_completion,
};
pub use ports::{
    ChannelError, CompletionChannel, Scheduler, SchedulerError, StoreError, Subscription,
    TaskStore,
};

pub mod prelude {
    pub use crate::config::TorcConfig;
    pub use crate::error::CoreError;
    pub use crate::phase::{Phase, PhaseContext, WaitPolicy, execute_phase};
    pub use crate::ports::{CompletionChannel, Scheduler, TaskStore};
}

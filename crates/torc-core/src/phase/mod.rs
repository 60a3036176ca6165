//! Phase execution: the hook each variant implements and the fixed template that drives it.
//!
//! A phase invocation runs `Submitting -> Waiting -> Logging` strictly in order and never retries;
//! retry across phases belongs to the orchestrator above.
mod context;
pub use context::PhaseContext;

mod record;
pub use record::record_outcome;

mod state;
pub use state::PhaseState;

mod template;
pub use template::execute_phase;

mod wait;
pub use wait::{WaitPolicy, wait_for_completion};

use async_trait::async_trait;
use torc_model::{PhaseId, PhaseRole};

use crate::error::CoreError;

/// Submission hook implemented by every phase variant.
///
/// The identity is fixed at construction, so a variant can never reach the wait step without one.
#[async_trait]
pub trait Phase: Send + Sync {
    fn id(&self) -> &PhaseId;

    fn role(&self) -> PhaseRole {
        self.id().role()
    }

    /// Build the variant's job and submit it; returns the submitted job name.
    ///
    /// Scheduler errors must be propagated unchanged.
    async fn start_job(&self, ctx: &PhaseContext) -> Result<String, CoreError>;
}

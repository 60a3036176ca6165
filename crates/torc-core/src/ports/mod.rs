//! Collaborators the orchestrator drives but does not implement.
//!
//! Implementations must be safe for concurrent use by independent phase invocations.
mod scheduler;
pub use scheduler::{Scheduler, SchedulerError};

mod channel;
pub use channel::{ChannelError, CompletionChannel, Subscription};

mod store;
pub use store::{StoreError, TaskStore};

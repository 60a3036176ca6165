use async_trait::async_trait;
use thiserror::Error;
use torc_model::{JobSpec, PvcSpec};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Rejected by the scheduler API (conflict, validation, authorization...).
    #[error("api error ({status}): {reason}")]
    Api { status: u16, reason: String },

    #[error("scheduler unavailable: {0}")]
    Unavailable(String),
}

/// Cluster scheduler client.
///
/// Submission is atomic on the scheduler side: after an error the object does not exist.
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Create the job and return its name.
    async fn submit_job(&self, job: &JobSpec) -> Result<String, SchedulerError>;

    /// Create a volume claim and return its name.
    async fn create_pvc(&self, pvc: &PvcSpec) -> Result<String, SchedulerError>;
}

use async_trait::async_trait;
use thiserror::Error;
use torc_model::{TaskId, TesState};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Durable task record.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Append system log lines to the current task log.
    async fn append_system_logs(&self, task: &TaskId, logs: &[String]) -> Result<(), StoreError>;

    /// Stamp the end time of the current task log.
    async fn set_log_end_time(&self, task: &TaskId) -> Result<(), StoreError>;

    async fn update_task_state(&self, task: &TaskId, state: TesState) -> Result<(), StoreError>;

    /// Open a new task log (one per pipeline attempt).
    async fn add_task_log(&self, task: &TaskId) -> Result<(), StoreError>;
}

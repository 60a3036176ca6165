use thiserror::Error;
use torc_model::ModelError;

use crate::ports::{ChannelError, SchedulerError, StoreError};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("task id is not set")]
    MissingIdentity,

    #[error("job submission failed: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("completion channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("completion channel '{0}' closed before a message arrived")]
    ChannelClosed(String),

    #[error("no completion on '{key}' within {timeout_ms} ms")]
    WaitTimedOut { key: String, timeout_ms: u64 },

    #[error("wait on '{0}' was canceled")]
    WaitCanceled(String),

    #[error("undecodable completion payload on '{key}': {reason}")]
    Decode { key: String, reason: String },

    #[error("task store error: {0}")]
    Store(#[from] StoreError),

    #[error("exiting due to error condition in asynchronous function (task {task}): {message}")]
    UpstreamFailure { task: String, message: String },

    #[error("duplicate environment variable: {0}")]
    DuplicateEnv(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CoreError {
    /// Conditions that invalidate every later phase of the pipeline.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CoreError::MissingIdentity | CoreError::UpstreamFailure { .. }
        )
    }

    /// Low-cardinality label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::MissingIdentity => "missing_identity",
            CoreError::Scheduler(_) => "scheduler",
            CoreError::Channel(_) | CoreError::ChannelClosed(_) => "channel",
            CoreError::WaitTimedOut { .. } => "timeout",
            CoreError::WaitCanceled(_) => "canceled",
            CoreError::Decode { .. } => "decode",
            CoreError::Store(_) => "store",
            CoreError::UpstreamFailure { .. } => "upstream",
            CoreError::DuplicateEnv(_) | CoreError::Config(_) => "config",
            CoreError::Model(_) | CoreError::Serialize(_) => "model",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_precondition_and_upstream_failures_are_fatal() {
        assert!(CoreError::MissingIdentity.is_fatal());
        assert!(
            CoreError::UpstreamFailure {
                task: "t".into(),
                message: "disk full".into()
            }
            .is_fatal()
        );
        assert!(!CoreError::WaitCanceled("t".into()).is_fatal());
        assert!(!CoreError::Config("bad".into()).is_fatal());
    }

    #[test]
    fn upstream_failure_message_names_the_task() {
        let err = CoreError::UpstreamFailure {
            task: "t-9".into(),
            message: "disk full".into(),
        };
        let text = err.to_string();
        assert!(text.contains("t-9") && text.contains("disk full"), "{text}");
    }
}

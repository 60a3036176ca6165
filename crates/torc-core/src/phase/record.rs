use torc_model::{CompletionMessage, PhaseId};
use tracing::{error, info, instrument};

use crate::{error::CoreError, ports::TaskStore};

/// Persist the terminal status of a phase.
///
/// `OK` only traces. `ERROR` appends the message as a system log, stamps the log end time and
/// then fails with [`CoreError::UpstreamFailure`], in that order. Store errors abort the sequence.
#[instrument(level = "debug", skip(store, msg), fields(job = %id, status = ?msg.status))]
pub async fn record_outcome(
    store: &dyn TaskStore,
    id: &PhaseId,
    msg: &CompletionMessage,
) -> Result<(), CoreError> {
    if !msg.is_error() {
        info!(task = %id.task(), detail = %msg.message, "phase completed");
        return Ok(());
    }

    error!(task = %id.task(), detail = %msg.message, "phase failed");
    store
        .append_system_logs(id.task(), std::slice::from_ref(&msg.message))
        .await?;
    store.set_log_end_time(id.task()).await?;

    Err(CoreError::UpstreamFailure {
        task: id.task().to_string(),
        message: msg.message.clone(),
    })
}

#[cfg(test)]
mod tests {
    use torc_model::{PhaseRole, TaskId};

    use super::*;
    use crate::{
        memory::{MemoryStore, StoreOp},
        ports::StoreError,
    };

    fn phase() -> PhaseId {
        PhaseId::new(PhaseRole::Execution, TaskId::new("t1").unwrap())
    }

    #[tokio::test]
    async fn ok_leaves_the_store_untouched() {
        let store = MemoryStore::new();

        record_outcome(&store, &phase(), &CompletionMessage::ok("done"))
            .await
            .unwrap();

        assert!(store.ops().is_empty());
    }

    #[tokio::test]
    async fn error_appends_log_then_end_time_then_fails() {
        let store = MemoryStore::new();

        let err = record_outcome(&store, &phase(), &CompletionMessage::error("disk full"))
            .await
            .unwrap_err();

        assert!(err.is_fatal());
        assert!(
            matches!(err, CoreError::UpstreamFailure { ref task, ref message } if task == "t1" && message == "disk full")
        );
        let ops = store.ops();
        assert_eq!(ops.len(), 2);
        assert!(matches!(&ops[0], StoreOp::AppendSystemLogs { task, logs } if task == "t1" && logs == &["disk full"]));
        assert!(matches!(&ops[1], StoreOp::SetLogEndTime { task, .. } if task == "t1"));
    }

    #[tokio::test]
    async fn store_failure_stops_the_sequence() {
        let store = MemoryStore::new();
        store.fail_with(StoreError::Backend("mongo down".into()));

        let err = record_outcome(&store, &phase(), &CompletionMessage::error("disk full"))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Store(StoreError::Backend(_))));
        assert!(store.ops().is_empty());
    }
}

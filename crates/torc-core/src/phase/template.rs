use tokio::time::Instant;
use torc_model::CompletionMessage;
use tracing::{debug, error, instrument, trace};

use crate::{
    error::CoreError,
    metrics::PhaseOutcome,
    phase::{Phase, PhaseContext, PhaseState, record_outcome, wait_for_completion},
};

/// Run one phase invocation: submit its job, wait for the completion message, record it.
///
/// A failed step ends the invocation; later steps never run. Returns the accepted message on
/// success.
#[instrument(level = "info", skip_all, fields(job = %phase.id(), role = %phase.role()))]
pub async fn execute_phase<P>(phase: &P, ctx: &PhaseContext) -> Result<CompletionMessage, CoreError>
where
    P: Phase + ?Sized,
{
    let id = phase.id();
    let role = id.role();
    let metrics = ctx.metrics();
    let mut state = PhaseState::Created;

    advance(&mut state, PhaseState::Submitting);
    let job = match phase.start_job(ctx).await {
        Ok(job) => job,
        Err(e) => {
            metrics.record_submit_error(role, e.kind());
            advance(&mut state, PhaseState::Failed);
            return Err(e);
        }
    };
    debug!(%job, "job submitted");
    metrics.record_phase_started(role);
    let started = Instant::now();

    advance(&mut state, PhaseState::Waiting);
    let msg = match wait_for_completion(ctx.channel(), id.channel_key(), ctx.wait_policy()).await {
        Ok(msg) => msg,
        Err(e) => {
            let outcome = match e {
                CoreError::WaitTimedOut { .. } => PhaseOutcome::TimedOut,
                CoreError::WaitCanceled(_) => PhaseOutcome::Canceled,
                _ => PhaseOutcome::Failed,
            };
            metrics.record_phase_completed(role, outcome, elapsed_ms(started));
            error!(error = %e, "completion wait failed");
            advance(&mut state, PhaseState::Failed);
            return Err(e);
        }
    };

    advance(&mut state, PhaseState::Logging);
    let recorded = record_outcome(ctx.store(), id, &msg).await;
    let outcome = if recorded.is_ok() {
        PhaseOutcome::Succeeded
    } else {
        PhaseOutcome::Failed
    };
    metrics.record_phase_completed(role, outcome, elapsed_ms(started));

    match recorded {
        Ok(()) => {
            advance(&mut state, PhaseState::Completed);
            Ok(msg)
        }
        Err(e) => {
            advance(&mut state, PhaseState::Failed);
            Err(e)
        }
    }
}

fn advance(state: &mut PhaseState, next: PhaseState) {
    debug_assert!(state.can_advance(next), "illegal transition {state} -> {next}");
    trace!(from = %state, to = %next, "phase state");
    *state = next;
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use async_trait::async_trait;
    use torc_model::{PhaseId, PhaseRole, TaskId};

    use super::*;
    use crate::{
        config::TorcConfig,
        memory::{MemoryChannel, MemoryScheduler, MemoryStore, StoreOp},
        ports::SchedulerError,
    };

    struct StubPhase {
        id: PhaseId,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubPhase {
        fn new(fail: bool) -> Self {
            Self {
                id: PhaseId::new(PhaseRole::InputStaging, TaskId::new("t1").unwrap()),
                fail,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Phase for StubPhase {
        fn id(&self) -> &PhaseId {
            &self.id
        }

        async fn start_job(&self, _: &PhaseContext) -> Result<String, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SchedulerError::Api {
                    status: 409,
                    reason: "AlreadyExists".into(),
                }
                .into());
            }
            Ok(self.id.job_name())
        }
    }

    fn context() -> (PhaseContext, Arc<MemoryChannel>, Arc<MemoryStore>) {
        let channel = Arc::new(MemoryChannel::new());
        let store = Arc::new(MemoryStore::new());
        let ctx = PhaseContext::new(
            Arc::new(MemoryScheduler::new()),
            channel.clone(),
            store.clone(),
            Arc::new(TorcConfig::default()),
        );
        (ctx, channel, store)
    }

    #[tokio::test]
    async fn submit_failure_skips_wait_and_record() {
        let (ctx, channel, store) = context();
        channel.publish("t1", &CompletionMessage::error("never read"));
        let phase = StubPhase::new(true);

        let err = execute_phase(&phase, &ctx).await.unwrap_err();

        assert!(matches!(err, CoreError::Scheduler(SchedulerError::Api { status: 409, .. })));
        assert_eq!(phase.calls.load(Ordering::SeqCst), 1);
        assert!(channel.subscriptions().is_empty());
        assert!(store.ops().is_empty());
    }

    #[tokio::test]
    async fn ok_completes_without_store_mutation() {
        let (ctx, channel, store) = context();
        channel.publish("t1", &CompletionMessage::ok("inputs staged"));

        let msg = execute_phase(&StubPhase::new(false), &ctx).await.unwrap();

        assert_eq!(msg.message, "inputs staged");
        assert_eq!(channel.subscriptions(), ["t1"]);
        assert!(store.ops().is_empty());
    }

    #[tokio::test]
    async fn error_is_persisted_then_fatal() {
        let (ctx, channel, store) = context();
        channel.publish("t1", &CompletionMessage::error("disk full"));

        let err = execute_phase(&StubPhase::new(false), &ctx).await.unwrap_err();

        assert!(err.is_fatal());
        let ops = store.ops();
        assert!(matches!(&ops[..], [
            StoreOp::AppendSystemLogs { logs, .. },
            StoreOp::SetLogEndTime { .. },
        ] if logs == &["disk full"]));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn error_is_logged_at_receipt_and_again_at_record() {
        let (ctx, channel, _) = context();
        channel.publish("t1", &CompletionMessage::error("disk full"));

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        let err = execute_phase(&StubPhase::new(false), &ctx).await.unwrap_err();
        drop(guard);

        assert!(err.is_fatal());
        let logs = String::from_utf8_lossy(&captured.0.lock().unwrap()).into_owned();
        let lines: Vec<&str> = logs.lines().filter(|l| l.contains("disk full")).collect();
        let received = lines
            .iter()
            .position(|l| l.contains("ERROR") && l.contains("phase reported an error"));
        let recorded = lines
            .iter()
            .position(|l| l.contains("ERROR") && l.contains("phase failed"));
        assert!(matches!((received, recorded), (Some(a), Some(b)) if a < b), "{logs}");
    }
}

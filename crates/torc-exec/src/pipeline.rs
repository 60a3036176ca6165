use torc_core::{CoreError, Phase, PhaseContext, SchedulerError, execute_phase};
use torc_model::{PvcSpec, TaskId, TesState, TesTask};
use tracing::{error, info, instrument, warn};

use crate::{InputStaging, OutputStaging, TaskExecution};

/// Task orchestrator: runs input staging, execution and output staging for one task.
///
/// A failed phase stops the pipeline. The whole pipeline is retried with exponential
/// backoff up to `pipeline.max_attempts`, but only while the failed attempt left no job
/// behind and the failure is not fatal: job names are fixed per task, so a resubmission
/// would collide with the earlier job.
#[derive(Debug, Clone)]
pub struct Torc {
    ctx: PhaseContext,
}

impl Torc {
    pub fn new(ctx: PhaseContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &PhaseContext {
        &self.ctx
    }

    #[instrument(level = "info", skip_all, fields(task = task.id.as_deref().unwrap_or("")))]
    pub async fn execute(&self, task: &TesTask) -> Result<(), CoreError> {
        let id = task.task_id().ok_or(CoreError::MissingIdentity)?;
        let pipeline = &self.ctx.config().pipeline;
        let mut attempt = 1;

        loop {
            let mut jobs_created = false;
            let err = match self.run_once(&id, task, &mut jobs_created).await {
                Ok(()) => {
                    info!(attempt, "pipeline completed");
                    return Ok(());
                }
                Err(e) => e,
            };

            error!(attempt, error = %err, "pipeline attempt failed");
            if let Err(e) = self
                .ctx
                .store()
                .update_task_state(&id, TesState::SystemError)
                .await
            {
                warn!(error = %e, "failed to mark task as system error");
            }

            if attempt >= pipeline.max_attempts {
                return Err(err);
            }
            if err.is_fatal() || jobs_created {
                warn!(attempt, fatal = err.is_fatal(), jobs_created, "not retrying pipeline");
                return Err(err);
            }
            attempt += 1;
            let delay = pipeline.backoff(attempt);
            warn!(attempt, delay_ms = delay.as_millis() as u64, "retrying pipeline");
            tokio::time::sleep(delay).await;
        }
    }

    async fn run_once(
        &self,
        id: &TaskId,
        task: &TesTask,
        jobs_created: &mut bool,
    ) -> Result<(), CoreError> {
        self.create_pvc(id, task.disk_gb()).await?;

        let store = self.ctx.store();
        store.update_task_state(id, TesState::Running).await?;
        store.add_task_log(id).await?;

        self.run_phase(&InputStaging::from_task(task)?, jobs_created).await?;
        self.run_phase(&TaskExecution::from_task(task.clone())?, jobs_created).await?;
        self.run_phase(&OutputStaging::from_task(task)?, jobs_created).await?;
        Ok(())
    }

    async fn run_phase(&self, phase: &dyn Phase, jobs_created: &mut bool) -> Result<(), CoreError> {
        let res = execute_phase(phase, &self.ctx).await;
        if res.as_ref().map_or_else(past_submission, |_| true) {
            *jobs_created = true;
        }
        res.map(|_| ())
    }

    /// Create the shared claim; an existing one from an earlier attempt is reused.
    async fn create_pvc(&self, id: &TaskId, disk_gb: Option<f64>) -> Result<(), CoreError> {
        let k8s = &self.ctx.config().kubernetes;
        let size = match disk_gb {
            Some(gb) if gb > 0.0 => format!("{}Gi", gb.ceil() as u64),
            _ => k8s.pvc_default_size.clone(),
        };
        let pvc = PvcSpec::shared(k8s.pvc_name(id.as_str()), size);

        match self.ctx.scheduler().create_pvc(&pvc).await {
            Ok(name) => {
                info!(%name, storage = pvc.storage().unwrap_or_default(), "pvc created");
                Ok(())
            }
            Err(SchedulerError::Api { status: 409, .. }) => {
                info!(name = %pvc.name(), "pvc already exists, reusing it");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to create pvc");
                Err(e.into())
            }
        }
    }
}

/// Whether `err` can only come after the phase job was accepted by the scheduler.
fn past_submission(err: &CoreError) -> bool {
    matches!(
        err,
        CoreError::WaitTimedOut { .. }
            | CoreError::WaitCanceled(_)
            | CoreError::ChannelClosed(_)
            | CoreError::Channel(_)
            | CoreError::Decode { .. }
            | CoreError::Store(_)
            | CoreError::UpstreamFailure { .. }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use torc_core::{
        TorcConfig,
        memory::{MemoryChannel, MemoryScheduler, MemoryStore},
    };
    use torc_model::TesResources;

    use super::*;

    fn torc() -> (Torc, Arc<MemoryScheduler>) {
        let scheduler = Arc::new(MemoryScheduler::new());
        let ctx = PhaseContext::new(
            scheduler.clone(),
            Arc::new(MemoryChannel::new()),
            Arc::new(MemoryStore::new()),
            Arc::new(TorcConfig::default()),
        );
        (Torc::new(ctx), scheduler)
    }

    #[tokio::test]
    async fn pvc_size_follows_requested_disk() {
        let (torc, scheduler) = torc();
        let id = TaskId::new("t1").unwrap();

        torc.create_pvc(&id, Some(2.5)).await.unwrap();
        let id2 = TaskId::new("t2").unwrap();
        torc.create_pvc(&id2, None).await.unwrap();

        let pvcs = scheduler.pvcs();
        assert_eq!(pvcs[0].name(), "pvc-t1");
        assert_eq!(pvcs[0].storage(), Some("3Gi"));
        assert_eq!(pvcs[1].storage(), Some("1Gi"));
    }

    #[tokio::test]
    async fn existing_pvc_is_reused() {
        let (torc, scheduler) = torc();
        let id = TaskId::new("t1").unwrap();

        torc.create_pvc(&id, None).await.unwrap();
        torc.create_pvc(&id, None).await.unwrap();

        assert_eq!(scheduler.pvcs().len(), 1);
    }

    #[test]
    fn only_wait_and_record_errors_leave_a_job() {
        assert!(past_submission(&CoreError::UpstreamFailure {
            task: "t1".into(),
            message: "boom".into(),
        }));
        assert!(past_submission(&CoreError::ChannelClosed("t1".into())));
        assert!(!past_submission(&SchedulerError::Unavailable("down".into()).into()));
        assert!(!past_submission(&CoreError::DuplicateEnv("S3_URL".into())));
    }

    #[tokio::test]
    async fn missing_id_fails_before_any_call() {
        let (torc, scheduler) = torc();
        let task = TesTask {
            resources: Some(TesResources::default()),
            ..TesTask::default()
        };

        let err = torc.execute(&task).await.unwrap_err();

        assert!(matches!(err, CoreError::MissingIdentity));
        assert!(scheduler.pvcs().is_empty());
    }
}

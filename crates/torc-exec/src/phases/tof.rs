use async_trait::async_trait;
use torc_core::{CoreError, Phase, PhaseContext, TorcConfig};
use torc_model::{JobSpec, PhaseId, PhaseRole, TaskId, TesOutput, TesTask};

use crate::{JobBuilder, JobRequest};

/// Uploads task outputs from the shared volume.
#[derive(Debug, Clone)]
pub struct OutputStaging {
    id: PhaseId,
    outputs: Vec<TesOutput>,
}

impl OutputStaging {
    pub fn new(task: TaskId, outputs: Vec<TesOutput>) -> Self {
        Self {
            id: PhaseId::new(PhaseRole::OutputStaging, task),
            outputs,
        }
    }

    pub fn from_task(task: &TesTask) -> Result<Self, CoreError> {
        Ok(Self::new(super::require_id(task)?, task.outputs().to_vec()))
    }

    pub fn request(&self, cfg: &TorcConfig) -> Result<JobRequest, CoreError> {
        let outputs = serde_json::to_string(&self.outputs)?;
        Ok(JobRequest::for_phase(self.id.clone(), cfg)
            .args(["--name", self.id.task().as_str(), "--outputs", outputs.as_str()])
            .mount_shared_volume(cfg))
    }

    pub fn build_job(&self, cfg: &TorcConfig) -> Result<JobSpec, CoreError> {
        JobBuilder::new(cfg).build(self.request(cfg)?)
    }
}

#[async_trait]
impl Phase for OutputStaging {
    fn id(&self) -> &PhaseId {
        &self.id
    }

    async fn start_job(&self, ctx: &PhaseContext) -> Result<String, CoreError> {
        let req = self.request(ctx.config())?;
        JobBuilder::new(ctx.config()).submit(ctx.scheduler(), req).await
    }
}

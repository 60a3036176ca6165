use async_trait::async_trait;
use torc_core::{CoreError, Phase, PhaseContext, TorcConfig};
use torc_model::{JobSpec, PhaseId, PhaseRole, TaskId, TesInput, TesTask};

use crate::{JobBuilder, JobRequest};

/// Stages task inputs into the shared volume.
#[derive(Debug, Clone)]
pub struct InputStaging {
    id: PhaseId,
    inputs: Vec<TesInput>,
}

impl InputStaging {
    pub fn new(task: TaskId, inputs: Vec<TesInput>) -> Self {
        Self {
            id: PhaseId::new(PhaseRole::InputStaging, task),
            inputs,
        }
    }

    pub fn from_task(task: &TesTask) -> Result<Self, CoreError> {
        Ok(Self::new(super::require_id(task)?, task.inputs().to_vec()))
    }

    pub fn request(&self, cfg: &TorcConfig) -> Result<JobRequest, CoreError> {
        let inputs = serde_json::to_string(&self.inputs)?;
        Ok(JobRequest::for_phase(self.id.clone(), cfg)
            .args(["--name", self.id.task().as_str(), "--inputs", inputs.as_str()])
            .mount_shared_volume(cfg))
    }

    pub fn build_job(&self, cfg: &TorcConfig) -> Result<JobSpec, CoreError> {
        JobBuilder::new(cfg).build(self.request(cfg)?)
    }
}

#[async_trait]
impl Phase for InputStaging {
    fn id(&self) -> &PhaseId {
        &self.id
    }

    async fn start_job(&self, ctx: &PhaseContext) -> Result<String, CoreError> {
        let req = self.request(ctx.config())?;
        JobBuilder::new(ctx.config()).submit(ctx.scheduler(), req).await
    }
}

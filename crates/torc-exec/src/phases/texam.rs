use async_trait::async_trait;
use torc_core::{CoreError, Phase, PhaseContext, TorcConfig};
use torc_model::{Env, EnvVar, JobSpec, KeySelector, PhaseId, PhaseRole, TesTask, ValueFrom};

use crate::{JobBuilder, JobRequest, config_map_env};

/// Config map keys the execution workload needs to spawn executor pods itself.
const EXECUTOR_SETTINGS: [&str; 5] = [
    "POIESIS_K8S_NAMESPACE",
    "POIESIS_SERVICE_ACCOUNT_NAME",
    "POIESIS_RESTART_POLICY",
    "POIESIS_IMAGE_PULL_POLICY",
    "POIESIS_JOB_TTL",
];

const MONITOR_TIMEOUT: &str = "MONITOR_TIMEOUT_SECONDS";

/// Runs the task's executors.
///
/// The only variant that ships the whole task document through the job, as a single
/// `--task` argument. Runs under the configured service account.
#[derive(Debug, Clone)]
pub struct TaskExecution {
    id: PhaseId,
    task: TesTask,
}

impl TaskExecution {
    pub fn from_task(task: TesTask) -> Result<Self, CoreError> {
        let id = PhaseId::new(PhaseRole::Execution, super::require_id(&task)?);
        Ok(Self { id, task })
    }

    pub fn task(&self) -> &TesTask {
        &self.task
    }

    pub fn request(&self, cfg: &TorcConfig) -> Result<JobRequest, CoreError> {
        let task = serde_json::to_string(&self.task)?;

        let mut env = Env::new();
        env.push(EnvVar::from_selector(
            MONITOR_TIMEOUT,
            ValueFrom::ConfigMapKeyRef(
                KeySelector::new(&cfg.kubernetes.configmap_name, MONITOR_TIMEOUT).optional(),
            ),
        ));
        env.extend(config_map_env(cfg, &EXECUTOR_SETTINGS));

        Ok(JobRequest::for_phase(self.id.clone(), cfg)
            .args(["--task".to_string(), task])
            .env(env)
            .service_account(&cfg.kubernetes.service_account_name))
    }

    pub fn build_job(&self, cfg: &TorcConfig) -> Result<JobSpec, CoreError> {
        JobBuilder::new(cfg).build(self.request(cfg)?)
    }
}

#[async_trait]
impl Phase for TaskExecution {
    fn id(&self) -> &PhaseId {
        &self.id
    }

    async fn start_job(&self, ctx: &PhaseContext) -> Result<String, CoreError> {
        let req = self.request(ctx.config())?;
        JobBuilder::new(ctx.config()).submit(ctx.scheduler(), req).await
    }
}

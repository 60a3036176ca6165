use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use torc_model::{JobSpec, PvcSpec};

use crate::ports::{Scheduler, SchedulerError};

#[derive(Debug, Default)]
struct SchedulerState {
    jobs: Vec<JobSpec>,
    pvcs: Vec<PvcSpec>,
    fail_jobs: Option<SchedulerError>,
    fail_pvcs: Option<SchedulerError>,
}

/// Scheduler that keeps submitted objects in memory.
///
/// Names are unique like on a real cluster: a second object with the same name is rejected
/// with a 409.
#[derive(Debug, Default)]
pub struct MemoryScheduler {
    inner: Mutex<SchedulerState>,
}

impl MemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every following job submission with `err`.
    pub fn fail_jobs_with(&self, err: SchedulerError) {
        self.lock().fail_jobs = Some(err);
    }

    /// Reject every following claim creation with `err`.
    pub fn fail_pvcs_with(&self, err: SchedulerError) {
        self.lock().fail_pvcs = Some(err);
    }

    /// Submitted jobs in submission order.
    pub fn jobs(&self) -> Vec<JobSpec> {
        self.lock().jobs.clone()
    }

    pub fn job(&self, name: &str) -> Option<JobSpec> {
        self.lock().jobs.iter().find(|j| j.name() == name).cloned()
    }

    pub fn job_names(&self) -> Vec<String> {
        self.lock().jobs.iter().map(|j| j.name().to_string()).collect()
    }

    pub fn pvcs(&self) -> Vec<PvcSpec> {
        self.lock().pvcs.clone()
    }

    /// Forget every submitted object, as if the cluster reaped them.
    pub fn reap(&self) {
        let mut state = self.lock();
        state.jobs.clear();
        state.pvcs.clear();
    }

    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn already_exists(kind: &str, name: &str) -> SchedulerError {
    SchedulerError::Api {
        status: 409,
        reason: format!("{kind} \"{name}\" already exists"),
    }
}

#[async_trait]
impl Scheduler for MemoryScheduler {
    async fn submit_job(&self, job: &JobSpec) -> Result<String, SchedulerError> {
        let mut state = self.lock();
        if let Some(err) = &state.fail_jobs {
            return Err(err.clone());
        }
        if state.jobs.iter().any(|j| j.name() == job.name()) {
            return Err(already_exists("jobs.batch", job.name()));
        }
        state.jobs.push(job.clone());
        Ok(job.name().to_string())
    }

    async fn create_pvc(&self, pvc: &PvcSpec) -> Result<String, SchedulerError> {
        let mut state = self.lock();
        if let Some(err) = &state.fail_pvcs {
            return Err(err.clone());
        }
        if state.pvcs.iter().any(|p| p.name() == pvc.name()) {
            return Err(already_exists("persistentvolumeclaims", pvc.name()));
        }
        state.pvcs.push(pvc.clone());
        Ok(pvc.name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use torc_model::{JobRunSpec, ObjectMeta, PodSpec, PodTemplateSpec, RestartPolicy};

    use super::*;

    fn job(name: &str) -> JobSpec {
        JobSpec::new(
            ObjectMeta::named(name),
            JobRunSpec {
                backoff_limit: None,
                ttl_seconds_after_finished: None,
                template: PodTemplateSpec {
                    spec: PodSpec {
                        security_context: Default::default(),
                        service_account_name: None,
                        containers: Vec::new(),
                        volumes: Vec::new(),
                        restart_policy: RestartPolicy::Never,
                    },
                },
            },
        )
    }

    #[tokio::test]
    async fn duplicate_names_conflict() {
        let scheduler = MemoryScheduler::new();

        assert_eq!(scheduler.submit_job(&job("tif-a")).await.unwrap(), "tif-a");
        let err = scheduler.submit_job(&job("tif-a")).await.unwrap_err();

        assert!(matches!(err, SchedulerError::Api { status: 409, .. }));
        assert_eq!(scheduler.job_names(), ["tif-a"]);
    }

    #[tokio::test]
    async fn injected_failure_leaves_nothing_behind() {
        let scheduler = MemoryScheduler::new();
        scheduler.fail_jobs_with(SchedulerError::Unavailable("apiserver down".into()));

        assert!(scheduler.submit_job(&job("tif-a")).await.is_err());
        assert!(scheduler.jobs().is_empty());
    }

    #[tokio::test]
    async fn reap_allows_resubmission() {
        let scheduler = MemoryScheduler::new();
        scheduler.create_pvc(&PvcSpec::shared("pvc-a", "1Gi")).await.unwrap();
        scheduler.submit_job(&job("tif-a")).await.unwrap();

        scheduler.reap();

        scheduler.create_pvc(&PvcSpec::shared("pvc-a", "1Gi")).await.unwrap();
        scheduler.submit_job(&job("tif-a")).await.unwrap();
        assert_eq!(scheduler.pvcs().len(), 1);
    }
}

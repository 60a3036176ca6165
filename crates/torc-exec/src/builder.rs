//! Hardened job construction and submission.
use torc_core::{CoreError, Scheduler, TorcConfig};
use torc_model::{
    Container, Env, JobRunSpec, JobSpec, Labels, ObjectMeta, PhaseId, PodSpec, PodTemplateSpec,
    Volume, VolumeMount,
};
use tracing::{error, info, instrument, warn};

use crate::{compose_env, container_security_context, pod_security_context};

/// Outcome of reading the configured job TTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TtlSetting {
    /// Nothing configured.
    Unset,
    Seconds(i32),
    /// Configured but not an integer; treated as "no TTL".
    Invalid(String),
}

impl TtlSetting {
    pub fn seconds(&self) -> Option<i32> {
        match self {
            TtlSetting::Seconds(s) => Some(*s),
            TtlSetting::Unset | TtlSetting::Invalid(_) => None,
        }
    }
}

/// Parse a raw TTL value. Never fails; see [`TtlSetting::Invalid`].
pub fn resolve_ttl(raw: Option<&str>) -> TtlSetting {
    match raw {
        None => TtlSetting::Unset,
        Some(raw) => match raw.trim().parse::<i32>() {
            Ok(secs) => TtlSetting::Seconds(secs),
            Err(_) => TtlSetting::Invalid(raw.to_string()),
        },
    }
}

/// Phase-specific part of a job: everything the hardened builder does not fix itself.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub phase: PhaseId,
    pub container_name: String,
    pub image: String,
    pub command: Vec<String>,
    pub args: Vec<String>,
    pub volumes: Vec<Volume>,
    pub volume_mounts: Vec<VolumeMount>,
    /// Appended after the shared environment.
    pub extra_env: Env,
    pub labels: Labels,
    pub service_account: Option<String>,
}

impl JobRequest {
    /// Request with the defaults for `phase`: container named after the role, the configured
    /// image, `<binary> <role> run` as entrypoint and the phase labels.
    pub fn for_phase(phase: PhaseId, cfg: &TorcConfig) -> Self {
        let prefix = phase.role().prefix();
        Self {
            container_name: prefix.to_string(),
            image: cfg.kubernetes.image.clone(),
            command: vec![
                cfg.kubernetes.workload_binary.clone(),
                prefix.to_string(),
                "run".to_string(),
            ],
            args: Vec::new(),
            volumes: Vec::new(),
            volume_mounts: Vec::new(),
            extra_env: Env::new(),
            labels: Labels::for_phase(&phase),
            service_account: None,
            phase,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn env(mut self, env: Env) -> Self {
        self.extra_env.extend(env);
        self
    }

    pub fn service_account(mut self, name: impl Into<String>) -> Self {
        self.service_account = Some(name.into());
        self
    }

    /// Mount the task's shared claim at the filer path.
    pub fn mount_shared_volume(mut self, cfg: &TorcConfig) -> Self {
        let k8s = &cfg.kubernetes;
        let claim = k8s.pvc_name(self.phase.task().as_str());
        self.volumes.push(Volume::claim(&k8s.pvc_volume_name, claim));
        self.volume_mounts
            .push(VolumeMount::new(&k8s.pvc_volume_name, &k8s.filer_pvc_path));
        self
    }
}

/// Builds jobs with the fixed security posture and submits them.
#[derive(Debug, Clone, Copy)]
pub struct JobBuilder<'a> {
    cfg: &'a TorcConfig,
}

impl<'a> JobBuilder<'a> {
    pub fn new(cfg: &'a TorcConfig) -> Self {
        Self { cfg }
    }

    /// Assemble the manifest for `req`.
    ///
    /// Environment is the shared set followed by `req.extra_env`; a later name overrides an
    /// earlier one. An unparseable TTL is logged and dropped, never an error.
    pub fn build(&self, req: JobRequest) -> Result<JobSpec, CoreError> {
        let k8s = &self.cfg.kubernetes;
        let env = compose_env(self.cfg)?.merged(&req.extra_env);

        let ttl = resolve_ttl(k8s.job_ttl.as_deref());
        if let TtlSetting::Invalid(raw) = &ttl {
            warn!(job = %req.phase, ttl = %raw, "invalid job TTL, falling back to no TTL");
        }

        let container = Container {
            name: req.container_name,
            image: req.image,
            command: req.command,
            args: req.args,
            env,
            security_context: container_security_context(k8s.run_as_user),
            volume_mounts: req.volume_mounts,
            image_pull_policy: Some(k8s.image_pull_policy),
        };
        let pod = PodSpec {
            security_context: pod_security_context(),
            service_account_name: req.service_account,
            containers: vec![container],
            volumes: req.volumes,
            restart_policy: k8s.restart_policy,
        };
        let spec = JobRunSpec {
            backoff_limit: Some(k8s.backoff_limit),
            ttl_seconds_after_finished: ttl.seconds(),
            template: PodTemplateSpec { spec: pod },
        };
        let meta = ObjectMeta::named(req.phase.job_name()).with_labels(req.labels);
        Ok(JobSpec::new(meta, spec))
    }

    /// Build and submit; scheduler errors are logged and returned unchanged.
    #[instrument(level = "debug", skip_all, fields(job = %req.phase))]
    pub async fn submit(
        &self,
        scheduler: &dyn Scheduler,
        req: JobRequest,
    ) -> Result<String, CoreError> {
        let job = self.build(req)?;
        match scheduler.submit_job(&job).await {
            Ok(name) => {
                info!(%name, namespace = %self.cfg.kubernetes.namespace, "job created");
                Ok(name)
            }
            Err(e) => {
                error!(error = %e, "failed to create job");
                Err(e.into())
            }
        }
    }
}

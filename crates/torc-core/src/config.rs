//! Orchestrator configuration.
//!
//! Every field has a default; [`TorcConfig::from_env`] overlays process environment variables.
use std::{str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use torc_model::{ImagePullPolicy, RestartPolicy};

use crate::error::CoreError;

/// Top-level configuration shared by every phase of a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorcConfig {
    pub kubernetes: KubernetesConfig,
    pub message_broker: MessageBrokerConfig,
    pub mongodb: MongoConfig,
    pub s3: S3Config,
    pub pipeline: PipelineConfig,
}

/// Cluster-side settings applied to every job manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubernetesConfig {
    pub namespace: String,
    /// Image every phase workload runs.
    pub image: String,
    /// Raw TTL seconds; parsed leniently when a job is built.
    pub job_ttl: Option<String>,
    pub backoff_limit: i32,
    pub restart_policy: RestartPolicy,
    pub image_pull_policy: ImagePullPolicy,
    pub pvc_prefix: String,
    pub pvc_volume_name: String,
    /// Mount path of the shared volume inside staging containers.
    pub filer_pvc_path: String,
    pub pvc_default_size: String,
    pub service_account_name: String,
    /// Config map holding runtime knobs such as `LOG_LEVEL`.
    pub configmap_name: String,
    /// Entrypoint binary of the workload image.
    pub workload_binary: String,
    pub run_as_user: i64,
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            namespace: "poiesis".to_string(),
            image: "docker.io/jaeaeich/poiesis:latest".to_string(),
            job_ttl: None,
            backoff_limit: 1,
            restart_policy: RestartPolicy::default(),
            image_pull_policy: ImagePullPolicy::default(),
            pvc_prefix: "pvc".to_string(),
            pvc_volume_name: "task-pvc-volume".to_string(),
            filer_pvc_path: "/transfer".to_string(),
            pvc_default_size: "1Gi".to_string(),
            service_account_name: "poiesis-sa".to_string(),
            configmap_name: "poiesis-core-configmap".to_string(),
            workload_binary: "poiesis".to_string(),
            run_as_user: 1000,
        }
    }
}

impl KubernetesConfig {
    /// Claim name of the shared volume for `task`.
    pub fn pvc_name(&self, task: &str) -> String {
        format!("{}-{task}", self.pvc_prefix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageBrokerConfig {
    pub host: String,
    pub port: u16,
    /// Secret carrying the broker password.
    pub secret: String,
}

impl Default for MessageBrokerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            secret: "poiesis-redis-secret".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub max_pool_size: u32,
    /// Secret carrying the database credentials.
    pub secret: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 27017,
            database: "poiesis".to_string(),
            max_pool_size: 10,
            secret: "poiesis-mongo-secret".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Config {
    pub url: String,
    /// Secret carrying the object-store access keys.
    pub secret: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            url: "http://localhost:9000".to_string(),
            secret: "poiesis-s3-secret".to_string(),
        }
    }
}

/// Retry and wait policy of the pipeline orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Whole-pipeline attempts; 1 disables retry.
    pub max_attempts: u32,
    /// Delay before the second attempt, doubled for each further one.
    pub base_delay_ms: u64,
    /// Per-phase completion deadline; `None` waits indefinitely.
    pub wait_timeout_ms: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 1000,
            wait_timeout_ms: None,
        }
    }
}

impl PipelineConfig {
    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout_ms.map(Duration::from_millis)
    }

    /// Backoff before attempt `attempt` (1-based; the first attempt has none).
    pub fn backoff(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = 1u64.checked_shl(attempt - 2).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

impl TorcConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each known variable.
    ///
    /// Blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        let k8s = &mut cfg.kubernetes;
        set_string(&get, "POIESIS_K8S_NAMESPACE", &mut k8s.namespace);
        set_string(&get, "POIESIS_IMAGE", &mut k8s.image);
        // Kept raw even when blank; the job builder warns about it.
        k8s.job_ttl = lookup("POIESIS_JOB_TTL");
        set_parsed(&get, "POIESIS_BACKOFF_LIMIT", &mut k8s.backoff_limit)?;
        set_parsed(&get, "POIESIS_RESTART_POLICY", &mut k8s.restart_policy)?;
        set_parsed(&get, "POIESIS_IMAGE_PULL_POLICY", &mut k8s.image_pull_policy)?;
        set_string(&get, "POIESIS_PVC_PREFIX", &mut k8s.pvc_prefix);
        set_string(&get, "POIESIS_PVC_DEFAULT_SIZE", &mut k8s.pvc_default_size);
        set_string(&get, "POIESIS_FILER_PVC_PATH", &mut k8s.filer_pvc_path);
        set_string(&get, "POIESIS_SERVICE_ACCOUNT_NAME", &mut k8s.service_account_name);
        set_string(&get, "POIESIS_CORE_CONFIGMAP_NAME", &mut k8s.configmap_name);
        set_parsed(&get, "POIESIS_RUN_AS_USER", &mut k8s.run_as_user)?;

        let broker = &mut cfg.message_broker;
        set_string(&get, "MESSAGE_BROKER_HOST", &mut broker.host);
        set_parsed(&get, "MESSAGE_BROKER_PORT", &mut broker.port)?;
        set_string(&get, "POIESIS_REDIS_SECRET_NAME", &mut broker.secret);

        let mongo = &mut cfg.mongodb;
        set_string(&get, "MONGODB_HOST", &mut mongo.host);
        set_parsed(&get, "MONGODB_PORT", &mut mongo.port)?;
        set_string(&get, "MONGODB_DATABASE", &mut mongo.database);
        set_parsed(&get, "MONGODB_MAX_POOL_SIZE", &mut mongo.max_pool_size)?;
        set_string(&get, "POIESIS_MONGO_SECRET_NAME", &mut mongo.secret);

        set_string(&get, "S3_URL", &mut cfg.s3.url);
        set_string(&get, "POIESIS_S3_SECRET_NAME", &mut cfg.s3.secret);

        let pipeline = &mut cfg.pipeline;
        set_parsed(&get, "POIESIS_PIPELINE_MAX_ATTEMPTS", &mut pipeline.max_attempts)?;
        set_parsed(&get, "POIESIS_PIPELINE_BASE_DELAY_MS", &mut pipeline.base_delay_ms)?;
        if let Some(raw) = get("POIESIS_WAIT_TIMEOUT_MS") {
            pipeline.wait_timeout_ms = Some(parse("POIESIS_WAIT_TIMEOUT_MS", &raw)?);
        }

        if cfg.pipeline.max_attempts == 0 {
            return Err(CoreError::Config(
                "POIESIS_PIPELINE_MAX_ATTEMPTS must be at least 1".into(),
            ));
        }
        Ok(cfg)
    }
}

fn set_string<G>(get: &G, key: &str, slot: &mut String)
where
    G: Fn(&str) -> Option<String>,
{
    if let Some(v) = get(key) {
        *slot = v;
    }
}

fn set_parsed<G, T>(get: &G, key: &str, slot: &mut T) -> Result<(), CoreError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = get(key) {
        *slot = parse(key, &raw)?;
    }
    Ok(())
}

fn parse<T>(key: &str, raw: &str) -> Result<T, CoreError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| CoreError::Config(format!("{key}={raw:?}: {e}")))
}

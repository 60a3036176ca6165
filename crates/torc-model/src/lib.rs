mod domain;
pub use domain::{Env, EnvSource, EnvVar, KeySelector, Labels, ValueFrom};
pub use domain::{LABEL_NAME, LABEL_PARENT, LABEL_SERVICE, PARENT_PREFIX};
pub use domain::{PhaseId, PhaseRole, TaskId};

mod error;
pub use error::{ModelError, ModelResult};

mod job;
pub use job::{
    Capabilities, Capability, Container, FsGroupChangePolicy, JobRunSpec, JobSpec, ObjectMeta,
    PodSecurityContext, PodSpec, PodTemplateSpec, PvcSpec, PvcVolumeSource, SeccompProfile,
    SeccompProfileType, SecurityContext, Volume, VolumeMount,
};

mod message;
pub use message::{CompletionMessage, MessageStatus};

mod strategy;
pub use strategy::{ImagePullPolicy, RestartPolicy};

mod task;
pub use task::{TesExecutor, TesFileType, TesInput, TesOutput, TesResources, TesState, TesTask};

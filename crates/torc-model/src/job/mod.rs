//! Scheduler-native manifests submitted by the orchestrator.
//!
//! Field names follow the scheduler's camelCase wire format so a serialized
//! [`JobSpec`] can be posted as-is.
mod meta;
pub use meta::ObjectMeta;

mod security;
pub use security::{
    Capabilities, Capability, FsGroupChangePolicy, PodSecurityContext, SeccompProfile,
    SeccompProfileType, SecurityContext,
};

mod volume;
pub use volume::{PvcVolumeSource, Volume, VolumeMount};

mod spec;
pub use spec::{Container, JobRunSpec, JobSpec, PodSpec, PodTemplateSpec};

mod pvc;
pub use pvc::PvcSpec;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    PARENT_PREFIX,
    error::{ModelError, ModelResult},
};

/// Identifier of a task; primary key of the durable task record.
///
/// Never empty: construction rejects blank input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> ModelResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ModelError::EmptyTaskId);
        }
        Ok(Self(id))
    }

    /// Fresh random id (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TaskId {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for TaskId {
    type Error = ModelError;
    fn try_from(s: String) -> ModelResult<Self> {
        Self::new(s)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stage of the task pipeline, each run as its own job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseRole {
    /// Task input filer: stages inputs into the shared volume.
    InputStaging,
    /// Task executor and monitor: runs the executors.
    Execution,
    /// Task output filer: uploads outputs from the shared volume.
    OutputStaging,
}

impl PhaseRole {
    /// Pipeline order.
    pub const ALL: [PhaseRole; 3] = [
        PhaseRole::InputStaging,
        PhaseRole::Execution,
        PhaseRole::OutputStaging,
    ];

    /// Prefix used for job names, container names and the `service` label.
    pub const fn prefix(self) -> &'static str {
        match self {
            PhaseRole::InputStaging => "tif",
            PhaseRole::Execution => "texam",
            PhaseRole::OutputStaging => "tof",
        }
    }

    /// Only staging phases touch the shared filer volume.
    pub const fn is_staging(self) -> bool {
        matches!(self, PhaseRole::InputStaging | PhaseRole::OutputStaging)
    }
}

impl fmt::Display for PhaseRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for PhaseRole {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        PhaseRole::ALL
            .into_iter()
            .find(|r| r.prefix() == s)
            .ok_or_else(|| ModelError::UnknownRole(s.to_string()))
    }
}

/// Identity of one phase invocation.
///
/// Ties together the job name (`<role>-<task>`), the completion channel key
/// (the task id) and the task record key. Job names are reversible through
/// [`PhaseId::from_job_name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhaseId {
    role: PhaseRole,
    task: TaskId,
}

impl PhaseId {
    pub fn new(role: PhaseRole, task: TaskId) -> Self {
        Self { role, task }
    }

    pub fn role(&self) -> PhaseRole {
        self.role
    }

    pub fn task(&self) -> &TaskId {
        &self.task
    }

    /// Name of the scheduler job.
    pub fn job_name(&self) -> String {
        format!("{}-{}", self.role.prefix(), self.task)
    }

    /// Identity of the orchestrator that owns this phase.
    pub fn parent(&self) -> String {
        format!("{PARENT_PREFIX}-{}", self.task)
    }

    /// Key of the completion channel the workload reports on.
    pub fn channel_key(&self) -> &str {
        self.task.as_str()
    }

    /// Recover the identity from a job name produced by [`PhaseId::job_name`].
    pub fn from_job_name(name: &str) -> ModelResult<Self> {
        let (prefix, task) = name
            .split_once('-')
            .ok_or_else(|| ModelError::MalformedJobName(name.to_string()))?;
        let role = prefix.parse()?;
        let task = TaskId::new(task).map_err(|_| ModelError::MalformedJobName(name.to_string()))?;
        Ok(Self { role, task })
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.role.prefix(), self.task)
    }
}

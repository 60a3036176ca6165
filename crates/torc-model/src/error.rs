use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("task id must not be empty")]
    EmptyTaskId,

    #[error("unknown phase role: {0}")]
    UnknownRole(String),

    #[error("malformed job name: {0}")]
    MalformedJobName(String),

    #[error("unknown restart policy: {0}")]
    UnknownRestart(String),

    #[error("unknown image pull policy: {0}")]
    UnknownPullPolicy(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

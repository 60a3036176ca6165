use thiserror::Error;

/// Failures while configuring or installing the process-wide subscriber.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// `LOG_FORMAT` named something other than text, json or journald.
    #[error("unknown log format '{0}'")]
    InvalidFormat(String),

    #[error("journald output requires a linux host")]
    JournaldNotSupported,

    #[error("journald layer init: {0}")]
    JournaldInitFailed(String),

    /// A global subscriber was installed earlier in this process.
    #[error("global subscriber is already set")]
    AlreadyInitialized,

    /// `LOG_LEVEL` could not be turned into a filter directive.
    #[error("unusable log level: {0}")]
    InvalidLevel(String),
}

pub type LoggerResult<T> = Result<T, LoggerError>;

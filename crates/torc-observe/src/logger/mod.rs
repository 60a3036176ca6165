mod config;
mod error;
mod logger;
mod object;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use object::{LoggerFormat, LoggerLevel};

/// Installs the global tracing subscriber described by `cfg`.
///
/// Call once, early in `main`; a second call fails with [`LoggerError::AlreadyInitialized`].
///
/// # Examples
/// ```rust
/// use torc_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::from_env().unwrap_or_default();
/// init_logger(&config).expect("Failed to initialize logger");
///
/// tracing::info!("orchestrator starting");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LoggerFormat::Text => logger::logger_text(cfg),
        LoggerFormat::Json => logger::logger_json(cfg),
        LoggerFormat::Journald => logger::logger_journald(cfg),
    }
}

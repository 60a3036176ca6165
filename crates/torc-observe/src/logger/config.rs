use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::logger::{LoggerError, LoggerFormat, LoggerLevel};

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// Filter expression (e.g. "info", "torc_exec=debug,info").
    pub level: LoggerLevel,
    /// Include module/target names in log output.
    pub with_targets: bool,
    /// Color text output; only honored on a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Defaults overlaid with `LOG_LEVEL` and `LOG_FORMAT`.
    pub fn from_env() -> Result<Self, LoggerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoggerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(level) = lookup("LOG_LEVEL").filter(|v| !v.trim().is_empty()) {
            cfg.level = level.parse()?;
        }
        if let Some(format) = lookup("LOG_FORMAT").filter(|v| !v.trim().is_empty()) {
            cfg.format = format.parse()?;
        }
        Ok(cfg)
    }

    /// Color only when enabled and stdout is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::rolling::Rotation;

/// Rotation period of the rolling log file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(value: LogRotation) -> Self {
        match value {
            LogRotation::Minutely => Self::MINUTELY,
            LogRotation::Hourly => Self::HOURLY,
            LogRotation::Daily => Self::DAILY,
            LogRotation::Never => Self::NEVER,
        }
    }
}

/// Deserializable logger configuration, consumed by [`crate::Logger::from_settings`].
///
/// Missing keys fall back to the defaults: console output at `info`, no file output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    pub name: String,
    pub console: bool,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
    pub env_filter: Option<String>,
    /// Directory for rolling log files. File output is disabled when absent.
    pub path: Option<PathBuf>,
    pub json: bool,
    pub rotation: LogRotation,
    pub max_files: usize,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            name: "dser".to_owned(),
            console: true,
            level: "info".to_owned(),
            env_filter: None,
            path: None,
            json: false,
            rotation: LogRotation::Daily,
            max_files: crate::DEFAULT_MAX_FILES,
        }
    }
}

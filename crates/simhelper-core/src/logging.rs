//! Logging configuration using tracing

use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result, ResultExt};

/// Filter used when no directive is given
pub const DEFAULT_DIRECTIVE: &str = "simhelper=info,warn";

/// File name prefix for the rolling log file
const LOG_FILE_NAME: &str = "simhelper.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Where and how much to log
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `simhelper=debug`
    pub directive: String,

    /// Write a daily-rolling file here instead of stderr
    pub log_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directive: DEFAULT_DIRECTIVE.to_string(),
            log_dir: None,
        }
    }
}

/// Initialize the logging subsystem
///
/// Logs go to stderr unless a log directory is configured, so stdout stays
/// free for command results.
pub fn init(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(&config.directive).map_err(|e| {
        Error::config(format!("Invalid log directive '{}': {}", config.directive, e))
    })?;

    let file_layer = match &config.log_dir {
        Some(dir) => {
            let dir = prepare_log_dir(dir)?;
            let file_appender = RollingFileAppender::new(Rotation::DAILY, &dir, LOG_FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_timer(fmt::time::ChronoLocal::new(TIMESTAMP_FORMAT.to_string())),
            )
        }
        None => None,
    };

    let stderr_layer = if config.log_dir.is_none() {
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_timer(fmt::time::ChronoLocal::new(TIMESTAMP_FORMAT.to_string())),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| Error::config(format!("Logging already initialized: {}", e)))?;

    tracing::debug!("Logging initialized with '{}'", config.directive);
    if let Some(dir) = &config.log_dir {
        tracing::info!("Log directory: {}", dir.display());
    }

    Ok(())
}

/// Create the log directory if needed and return it
fn prepare_log_dir(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    Ok(dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_logs_to_stderr() {
        let config = LogConfig::default();
        assert_eq!(config.directive, DEFAULT_DIRECTIVE);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_prepare_log_dir_creates_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");

        let dir = prepare_log_dir(&nested).unwrap();

        assert!(dir.is_dir());
        assert_eq!(dir, nested);
    }

    #[test]
    fn test_invalid_directive_is_config_error() {
        let config = LogConfig {
            directive: "simhelper=notalevel".to_string(),
            log_dir: None,
        };
        let err = init(&config).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}

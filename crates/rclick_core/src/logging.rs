//! Logging setup for hosts embedding rclick.
//!
//! Interactive runs log to the terminal. Everything else logs to a daily
//! rotating file under [`log_dir`], with `info` and above mirrored to stdout.
//! `RCLICK_LOG` (then `RUST_LOG`) overrides the build-type default filter.

use std::error::Error;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "RCLICK_LOG";

const LOG_FILE_PREFIX: &str = "rclick";

/// Where and how much to log.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory that receives the rotating log files.
    pub log_dir: PathBuf,
    /// Log to the terminal only. Defaults to whether stdout is a TTY.
    pub is_pty: bool,
    /// Filter directive taking precedence over the environment.
    pub log_filter: Option<String>,
}

impl LogConfig {
    pub fn new(log_dir: PathBuf) -> Self {
        Self { log_dir, is_pty: atty::is(atty::Stream::Stdout), log_filter: None }
    }

    /// Builder: use `filter` instead of the environment or the default.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Resolve the filter: explicit, then `RCLICK_LOG`, then `RUST_LOG`, then
    /// [`default_log_filter`]. An unparsable explicit filter falls back to the
    /// default.
    pub fn env_filter(&self) -> EnvFilter {
        match &self.log_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(default_log_filter()))
            }
            None => EnvFilter::try_from_env(LOG_ENV_VAR)
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter())),
        }
    }
}

/// Keeps the background file writer alive. Hold it until shutdown; dropping
/// it flushes buffered entries.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _writer: Option<WorkerGuard>,
}

/// Install the global subscriber described by `config`.
///
/// Falls back to terminal logging if the log file cannot be opened. If a
/// subscriber is already installed, the existing one is kept.
pub fn init_logging(config: LogConfig) -> LoggingGuard {
    let filter = config.env_filter();
    if config.is_pty {
        install_console(filter);
        return LoggingGuard { _writer: None };
    }

    match open_log_file(&config.log_dir) {
        Ok((writer, guard)) => {
            let _ = tracing_subscriber::fmt()
                .with_writer(std::io::stdout.with_max_level(tracing::Level::INFO).and(writer))
                .with_env_filter(filter)
                .with_target(true)
                .try_init();
            LoggingGuard { _writer: Some(guard) }
        }
        Err(e) => {
            eprintln!("rclick: cannot log to {}: {e}; logging to console", config.log_dir.display());
            install_console(filter);
            LoggingGuard { _writer: None }
        }
    }
}

/// [`init_logging`] with the default directory and filter.
pub fn init_logging_default() -> LoggingGuard {
    init_logging(LogConfig::new(log_dir()))
}

fn install_console(filter: EnvFilter) {
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

fn open_log_file(dir: &Path) -> Result<(NonBlocking, WorkerGuard), Box<dyn Error>> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(dir)?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Filter used when neither the config nor the environment sets one.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "debug,rclick=trace,rclick_core=trace,rclick_ui=debug,gpui=warn"
    } else {
        "info,gpui=warn"
    }
}

/// Platform data directory for log files, or the temp dir if there is none.
pub fn log_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(std::env::temp_dir).join("rclick").join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(default_log_filter()).is_ok());
    }

    #[test]
    fn test_explicit_filter_wins() {
        let config = LogConfig::new(PathBuf::from("logs")).with_filter("warn");
        assert_eq!(config.log_filter.as_deref(), Some("warn"));
        assert_eq!(config.env_filter().max_level_hint(), Some(tracing::level_filters::LevelFilter::WARN));
    }

    #[test]
    fn test_log_file_is_created_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let (_writer, _guard) = open_log_file(&nested).unwrap();
        assert!(nested.is_dir());
        assert!(log_dir().ends_with("rclick/logs"));
    }
}

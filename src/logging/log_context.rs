use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use snafu::{ResultExt, Snafu};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::data::LogLevel;
use crate::cli::Cli;

/// Environment variable holding filter directives that override the CLI level.
pub const LOG_ENV_VAR: &str = "DIRDIFF_LOG";

const TIMESTAMP_FORMAT: &str = "[%Y-%m-%d %H:%M:%S]";

/// Name of the run log for a process started at `started`.
pub fn log_file_name<Tz: TimeZone>(started: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("update{}.log", started.format("%Y%m%d%H%M%S"))
}

#[derive(Debug, Clone)]
pub struct LoggingOptions {
    pub level: LogLevel,
    pub log_dir: PathBuf,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            log_dir: PathBuf::from("."),
        }
    }
}

impl From<&Cli> for LoggingOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            level: cli.log_level,
            log_dir: cli.log_dir.clone(),
        }
    }
}

/// Handle on the logging set up for this process.
///
/// Created once at start-up; the installed subscriber lives for the rest of
/// the process and owns the open log file.
#[derive(Debug)]
pub struct LoggingContext {
    log_file: Option<PathBuf>,
}

impl LoggingContext {
    pub fn init(options: &LoggingOptions) -> Result<Self, LoggingError> {
        let Some(level) = options.level.to_tracing_level() else {
            return Ok(Self { log_file: None });
        };

        let log_file = Self::log_file_path(&options.log_dir);
        if !options.log_dir.as_os_str().is_empty() {
            fs::create_dir_all(&options.log_dir).context(LogDirectorySnafu {
                path: &options.log_dir,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context(LogFileSnafu { path: &log_file })?;

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(level).into())
            .with_env_var(LOG_ENV_VAR)
            .from_env_lossy();
        let use_color = supports_color::on(supports_color::Stream::Stdout).is_some();

        Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(file),
            )
            .with(
                fmt::layer()
                    .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(false)
                    .with_ansi(use_color)
                    .with_writer(std::io::stdout),
            )
            .try_init()
            .context(SubscriberSnafu)?;

        Ok(Self {
            log_file: Some(log_file),
        })
    }

    /// The run log, or `None` when logging is silenced.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    fn log_file_path(log_dir: &Path) -> PathBuf {
        log_dir.join(log_file_name(&Local::now()))
    }
}

#[derive(Debug, Snafu)]
pub enum LoggingError {
    #[snafu(display("Failed to create log directory {}", path.display()))]
    LogDirectoryError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to open log file {}", path.display()))]
    LogFileError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to install the log subscriber"))]
    SubscriberError {
        source: tracing_subscriber::util::TryInitError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_log_file_name_uses_compact_timestamp() {
        let started = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        assert_eq!(log_file_name(&started), "update20240102030405.log");
    }

    #[test]
    fn test_log_file_path_is_inside_log_dir() {
        let path = LoggingContext::log_file_path(Path::new("/var/log/dirdiff"));

        assert_eq!(path.parent(), Some(Path::new("/var/log/dirdiff")));
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("update"));
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "update".len() + 14 + ".log".len());
    }

    #[test]
    fn test_silent_level_creates_no_log_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let options = LoggingOptions {
            level: LogLevel::Silent,
            log_dir: temp_dir.path().to_path_buf(),
        };

        let context = LoggingContext::init(&options).unwrap();

        assert!(context.log_file().is_none());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}

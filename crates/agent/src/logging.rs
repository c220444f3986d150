//! Tracing subscriber setup for the agent binary.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";
const LOG_DIR_VAR: &str = "TALLYBRIDGE_LOG_DIR";
const LOG_FILE_NAME: &str = "tallybridge-agent.log";

/// Keeps the non-blocking file writer alive; dropping it flushes the log.
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
    pub log_file: Option<PathBuf>,
}

/// Install the global subscriber.
///
/// Always logs to stdout. When `TALLYBRIDGE_LOG_DIR` is set, also appends to
/// `<dir>/tallybridge-agent.log`. `RUST_LOG` overrides the default `info`
/// filter.
pub fn init() -> anyhow::Result<LoggingGuard> {
    let filter = env_filter();
    let stdout = fmt::layer().with_target(true);

    match log_dir() {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = fmt::layer().with_ansi(false).with_writer(writer);

            tracing_subscriber::registry().with(filter).with(stdout).with(file).try_init()?;
            Ok(LoggingGuard { _file: Some(guard), log_file: Some(dir.join(LOG_FILE_NAME)) })
        }
        None => {
            tracing_subscriber::registry().with(filter).with(stdout).try_init()?;
            Ok(LoggingGuard { _file: None, log_file: None })
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn log_dir() -> Option<PathBuf> {
    std::env::var(LOG_DIR_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

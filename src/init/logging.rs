use anyhow::anyhow;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt::writer::BoxMakeWriter};

use super::config::{AppConfig, LogFormat};

const DEFAULT_FILTER: &str = "info,tower_http=info";
const LOG_FILE_PREFIX: &str = "blog-be.log";

/// Installs the global subscriber. With `LOG_DIR` set, output goes to a
/// daily-rolling file instead of stdout; keep the returned guard alive or
/// buffered lines are lost on exit.
pub fn init_logging(config: &AppConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (writer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.log_dir.is_none())
        .with_writer(writer);

    match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    }
    .map_err(|e| anyhow!("tracing init failed: {e}"))?;

    Ok(guard)
}

// Logging module - tracing subscriber setup
//
// Human-readable logs go to stderr: stdout belongs to the host protocol
// (JSON lines) when running as a daemon. File logging optionally adds a
// rotating JSON log next to it.
//
// Precedence: RUST_LOG env var > config file > default "info"

use crate::config::{LogRotation, LoggingConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when RUST_LOG is not set
pub fn default_directive(level: &str) -> String {
    let level = level.trim();
    let level = if level.is_empty() { "info" } else { level };
    format!("suntint={}", level)
}

fn filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(&config.level).into())
}

/// Rolling appender for the configured rotation
fn file_appender(config: &LoggingConfig) -> tracing_appender::rolling::RollingFileAppender {
    match config.file_rotation {
        LogRotation::Hourly => {
            tracing_appender::rolling::hourly(&config.file_dir, &config.file_prefix)
        }
        LogRotation::Daily => tracing_appender::rolling::daily(&config.file_dir, &config.file_prefix),
        LogRotation::Never => tracing_appender::rolling::never(&config.file_dir, &config.file_prefix),
    }
}

/// Install the global subscriber.
///
/// The returned guard must be kept alive for the duration of the program so
/// file logs flush.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if !config.file_enabled {
        tracing_subscriber::registry()
            .with(filter(config))
            .with(stderr)
            .init();
        return None;
    }

    if let Err(e) = std::fs::create_dir_all(&config.file_dir) {
        eprintln!(
            "Warning: Could not create log directory {:?}: {}",
            config.file_dir, e
        );
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(filter(config))
            .with(stderr)
            .init();
        return None;
    }

    // Writes happen on a background thread
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(config));

    tracing_subscriber::registry()
        .with(filter(config))
        .with(stderr)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Some(guard)
}

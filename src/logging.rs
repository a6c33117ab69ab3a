use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_rolling_file::{RollingConditionBase, RollingFileAppender};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::config::LoggingConfig;

/// Guard wrapper that ensures logs are flushed on drop
pub struct LogGuard(Option<WorkerGuard>);

impl Drop for LogGuard {
    fn drop(&mut self) {
        if let Some(guard) = self.0.take() {
            // Explicitly drop the guard to flush logs
            drop(guard);
            // Give the writer a moment to finish flushing
            std::thread::sleep(std::time::Duration::from_millis(200));
        }
    }
}

fn resolve_level(config: Option<&LoggingConfig>, verbose: bool) -> Level {
    if verbose {
        return Level::DEBUG;
    }

    match config {
        Some(config) => match config.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" | "warning" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO, // Default to INFO for invalid levels
        },
        None => Level::INFO,
    }
}

/// Initialize logging to console and optionally to a rolling file
///
/// `--verbose` wins over the configured level. Returns a LogGuard that must
/// be kept alive for the duration of the program.
pub fn init_logging(
    config: Option<&LoggingConfig>,
    verbose: bool,
) -> Result<LogGuard, anyhow::Error> {
    let level = resolve_level(config, verbose);

    let (file_layer, guard) = match config {
        Some(config) => {
            if let Some(parent) = Path::new(&config.path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }

            let file_appender = RollingFileAppender::new(
                &config.path,
                RollingConditionBase::new().max_size(config.size * 1024 * 1024),
                config.max_files,
            )
            .map_err(|e| anyhow::anyhow!("Failed to create rolling file appender: {}", e))?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::from_level(level));

            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(true)
                .with_filter(tracing_subscriber::filter::LevelFilter::from_level(level)),
        )
        .with(file_layer)
        .init();

    Ok(LogGuard(guard))
}

use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Initializes the logging system with both console and file output.
///
/// The returned guard flushes the file writer when dropped, so the caller
/// keeps it alive for the whole run.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    // Console layer goes to stderr so stdout stays free for command output
    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    // Respect RUST_LOG if set; otherwise use the configured default
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    // Without a log directory we still want console output
    let (file_layer, guard, dir_error) = match fs::create_dir_all(&config.dir) {
        Ok(()) => {
            // Create a non-blocking file appender for daily log rotation
            let file_appender = tracing_appender::rolling::daily(&config.dir, &config.file_name);
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

            // Create a JSON layer for file logging
            let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
            (Some(file_layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    if let Some(e) = dir_error {
        tracing::warn!("File logging disabled, cannot create {}: {}", config.dir.display(), e);
    }

    guard
}

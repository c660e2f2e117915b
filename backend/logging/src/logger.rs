//! Structured Logger
//!
//! Wraps `tracing` with a console layer and a daily-rolling JSON file layer,
//! with `RUST_LOG` taking precedence over the configured level.

use std::path::Path;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global structured logger.
///
/// Falls back to console-only output when the log directory cannot be
/// created. Safe to call more than once; later calls are ignored.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) {
    let log_dir = log_dir.as_ref();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, file_error) = match file_appender(log_dir) {
        Ok(appender) => {
            let layer = fmt::layer()
                .json()
                .with_writer(appender)
                .with_ansi(false);
            (Some(layer), None)
        }
        Err(e) => (None, Some(e)),
    };

    // stderr keeps stdout clean for the JSON the CLI prints
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if let Some(e) = file_error {
        tracing::warn!(
            log_dir = %log_dir.display(),
            error = %e,
            "Log directory unavailable, logging to console only"
        );
    }
}

/// logs/mittiscan.log.YYYY-MM-DD
fn file_appender(log_dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("mittiscan.log")
        .build(log_dir)
}

//! Logging infrastructure.
//!
//! This module provides:
//! - Per-file loggers with file + host callback dual output
//! - A bounded tail buffer for error diagnosis
//! - Integration with the `tracing` ecosystem for library-level diagnostics
//!
//! # Example
//!
//! ```no_run
//! use subsidecar_core::logging::{JobLogger, LogConfig};
//!
//! let logger = JobLogger::new("movie.mkv", "/path/to/logs", LogConfig::default(), None).unwrap();
//! logger.info("Starting extraction");
//! logger.command("ffmpeg -i movie.mkv ...");
//! logger.progress(50);
//! logger.success("Extraction complete");
//! ```

mod job_logger;
mod types;

pub use job_logger::JobLogger;
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber for application-wide logging.
///
/// Respects `RUST_LOG`, falling back to the provided default level. Should
/// be called once at host startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Convert LogLevel to filter string.
fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

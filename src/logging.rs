//! Logging setup
//!
//! Console output is the report channel: INFO and above, bare messages.
//! With `--debug` the console switches to the verbose timestamped format.
//! Everything down to DEBUG goes to the log file.
//!
//! Call sites use the `log_*!` macros with a per-file `MODULE` constant,
//! which becomes the tracing target.

use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer, Registry};

use crate::config;

/// Log at INFO level for a module
#[macro_export]
macro_rules! log_info {
    ($module:expr, $($arg:tt)+) => {
        tracing::info!(target: $module, $($arg)+)
    };
}

/// Log at WARN level for a module
#[macro_export]
macro_rules! log_warn {
    ($module:expr, $($arg:tt)+) => {
        tracing::warn!(target: $module, $($arg)+)
    };
}

/// Log at ERROR level for a module
#[macro_export]
macro_rules! log_error {
    ($module:expr, $($arg:tt)+) => {
        tracing::error!(target: $module, $($arg)+)
    };
}

/// Log at DEBUG level for a module (log file, or console with `--debug`)
#[macro_export]
macro_rules! log_debug {
    ($module:expr, $($arg:tt)+) => {
        tracing::debug!(target: $module, $($arg)+)
    };
}

fn timer() -> ChronoLocal {
    ChronoLocal::new(config::logging::TIMESTAMP_FORMAT.to_string())
}

/// Initialize console and file logging
///
/// # Arguments
/// * `verbose` - Switch the console to the verbose format
/// * `log_dir` - Directory for the log file (current directory when `None`)
///
/// # Returns
/// The file writer guard; dropping it flushes and closes the log file,
/// so it must live until the end of `main`.
pub fn init(verbose: bool, log_dir: Option<&Path>) -> std::io::Result<WorkerGuard> {
    let log_dir = log_dir.unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, config::logging::LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console: Box<dyn Layer<Registry> + Send + Sync> = if verbose {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_timer(timer())
            .with_target(true)
            .with_filter(LevelFilter::INFO)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stdout)
            .without_time()
            .with_level(false)
            .with_target(false)
            .with_filter(LevelFilter::INFO)
            .boxed()
    };

    let file = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_timer(timer())
        .with_target(true)
        .with_filter(LevelFilter::DEBUG);

    tracing_subscriber::registry().with(console).with(file).init();

    log_debug!("logging", "Logging is configured (verbose console: {})", verbose);
    log_debug!(
        "logging",
        "Log file: {}",
        log_dir.join(config::logging::LOG_FILE_NAME).display()
    );

    Ok(guard)
}

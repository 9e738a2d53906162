//! Logging system initialization
//!
//! Sets up tracing-based logging with file output to `app.log` in the config
//! directory and automatic rotation on application startup keeping 10
//! historical files.

use crate::config::store::{APP_NAME, config_directory_for};
use crate::error::{LauncherError, Result, StringError};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Maximum number of historical log files to keep (app.log.1 through app.log.9)
const MAX_LOG_FILES: u8 = 9;

/// Initialize the logging system
///
/// Log level defaults to INFO but can be configured via `RUST_LOG` environment variable.
/// Rotates existing logs on startup to maintain a history of the last 10 sessions.
pub fn init_logging() -> Result<()> {
    let log_dir = config_directory_for(APP_NAME);
    std::fs::create_dir_all(&log_dir)?;

    // Rotate existing log files on startup
    let log_path = log_dir.join("app.log");
    rotate_logs_on_startup(&log_path)?;

    // Create rolling file appender
    // Note: tracing_appender's RollingFileAppender doesn't support startup-based rotation
    // with our desired file retention policy, so we handle rotation manually
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER) // We handle rotation manually on startup
        .filename_prefix("app")
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| LauncherError::Logging(Box::new(e)))?;

    // Build the subscriber with file output
    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false) // Disable ANSI colors for file output
        .with_target(true) // Include target module
        .with_thread_ids(true) // Include thread IDs
        .with_file(true) // Include file names
        .with_line_number(true) // Include line numbers
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LauncherError::Logging(Box::new(e)))?;

    tracing::info!("{} v{} started", APP_NAME, env!("CARGO_PKG_VERSION"));

    Ok(())
}

/// Rotate log files on application startup
///
/// Rotates existing logs to maintain a history of the last 10 application sessions:
/// - app.log.9 is deleted (oldest log)
/// - app.log.8 -> app.log.9
/// - ... (and so on)
/// - app.log.1 -> app.log.2
/// - app.log -> app.log.1
/// - A fresh app.log will be created by the logger
///
/// This function is called unconditionally on every application startup,
/// regardless of log file size, ensuring each session's logs are preserved separately.
fn rotate_logs_on_startup(log_path: &PathBuf) -> Result<()> {
    // If the current log doesn't exist, nothing to rotate
    if !log_path.exists() {
        return Ok(());
    }

    // Get the parent directory for constructing numbered log paths
    let log_dir = log_path
        .parent()
        .ok_or_else(|| LauncherError::Logging(StringError::new("Invalid log path")))?;

    let log_name = log_path
        .file_name()
        .ok_or_else(|| LauncherError::Logging(StringError::new("Invalid log filename")))?
        .to_string_lossy();

    // Delete the oldest log file (app.log.9) if it exists
    let oldest_log = log_dir.join(format!("{log_name}.{MAX_LOG_FILES}"));
    if oldest_log.exists() {
        std::fs::remove_file(&oldest_log)?;
    }

    // Rotate log files from 8 down to 1
    // app.log.8 -> app.log.9, app.log.7 -> app.log.8, ..., app.log.1 -> app.log.2
    for i in (1..MAX_LOG_FILES).rev() {
        let current_log = log_dir.join(format!("{log_name}.{i}"));
        let next_log = log_dir.join(format!("{log_name}.{}", i + 1));

        if current_log.exists() {
            std::fs::rename(&current_log, &next_log)?;
        }
    }

    // Rotate the current log file (app.log -> app.log.1)
    let log_1 = log_dir.join(format!("{log_name}.1"));
    std::fs::rename(log_path, &log_1)?;

    Ok(())
}

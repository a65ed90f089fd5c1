//! Logging infrastructure for localrag.
//!
//! This module initializes the tracing subscriber for structured logging.
//! All console logs are emitted to stderr to keep stdout clean for answers.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Initialize the tracing subscriber with stderr output and an optional log file.
///
/// This sets up structured logging with:
/// - Output to stderr (stdout is reserved for data)
/// - Environment-based filtering (RUST_LOG or provided level)
/// - Optional ANSI color control
/// - An optional append-only log file without ANSI escapes
///
/// # Arguments
/// * `log_level` - Optional log level override (e.g., "debug", "info")
/// * `no_color` - Disable colored output
/// * `log_file` - Optional file that receives a copy of every event
///
/// # Example
/// ```no_run
/// use localrag_core::logging::init_logging;
///
/// init_logging(None, false, None).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool, log_file: Option<&Path>) -> AppResult<()> {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_str = log_level.unwrap_or(&default_level);

    let env_filter = EnvFilter::try_new(filter_str)
        .map_err(|e| AppError::Config(format!("Invalid log filter: {}", e)))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!no_color && supports_color());

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    AppError::Config(format!("Failed to open log file {:?}: {}", path, e))
                })?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_target(true)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

/// Check if the terminal supports color output.
fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_is_created() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("localrag.log");
        // May fail if another test installed the subscriber first; the file is opened before that.
        let _ = init_logging(Some("info"), true, Some(&path));
        assert!(path.exists());
    }

    #[test]
    fn test_second_init_is_rejected() {
        let _ = init_logging(None, true, None);
        // The global subscriber is installed by now, whichever test got there first.
        let err = init_logging(None, true, None).unwrap_err();
        assert!(err.to_string().contains("Failed to init logging"));
    }

    #[test]
    fn test_unopenable_log_file_is_config_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = init_logging(Some("info"), true, Some(temp.path())).unwrap_err();
        assert!(matches!(err, AppError::Config(ref msg) if msg.contains("Failed to open log file")));
    }
}

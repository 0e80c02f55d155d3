//! Shared logging utilities for consistent tracing across the sweep

use chrono::{DateTime, Utc};
use std::fmt::Display;
use tracing::{error, info, warn};

/// Build the default filter directive for a base level
pub fn filter_directive(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("simsweep={base_level},shared={base_level}")
}

/// Initialize the tracing subscriber
///
/// `RUST_LOG` takes precedence over `log_level` when it is set.
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level)));

    // try_init: tests and embedders may already have a subscriber installed
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for experiment-scoped info logging
#[macro_export]
macro_rules! job_info {
    ($experiment:expr, $($arg:tt)*) => {
        tracing::info!(
            experiment = %$experiment,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for experiment-scoped warning logging
#[macro_export]
macro_rules! job_warn {
    ($experiment:expr, $($arg:tt)*) => {
        tracing::warn!(
            experiment = %$experiment,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for experiment-scoped error logging
#[macro_export]
macro_rules! job_error {
    ($experiment:expr, $($arg:tt)*) => {
        tracing::error!(
            experiment = %$experiment,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for experiment-scoped debug logging
#[macro_export]
macro_rules! job_debug {
    ($experiment:expr, $($arg:tt)*) => {
        tracing::debug!(
            experiment = %$experiment,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(run_id: &dyn Display, details: &str) {
    info!(
        run = %run_id,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(run_id: &dyn Display, context: &str, error: &dyn Display) {
    error!(
        run = %run_id,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(run_id: &dyn Display, message: &str) {
    info!(
        run = %run_id,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}

/// Contextual logging helper for progress updates
pub fn log_progress(run_id: &dyn Display, action: &str, details: &str) {
    info!(
        run = %run_id,
        timestamp = format_timestamp(),
        "📋 {}: {}",
        action,
        details
    );
}

/// Contextual logging helper for conditions worth a look but not fatal
pub fn log_warning(run_id: &dyn Display, message: &str) {
    warn!(
        run = %run_id,
        timestamp = format_timestamp(),
        "⚠️ {}",
        message
    );
}

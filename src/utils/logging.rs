//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for wizard sessions and the chart-to-Excel proxy.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;
use crate::utils::errors::{WizardError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for as long as file logging is wanted.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| WizardError::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match config.file_path.as_deref() {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "finwizard.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| WizardError::Config(format!("Logging already initialized: {}", e)))?;

    info!("{} logging initialized with level: {}", crate::info(), config.level);
    Ok(guard)
}

/// Log a step change made by the caller
pub fn log_step_transition(workflow_id: &str, from: u32, to: u32) {
    info!(
        workflow_id = workflow_id,
        from_step = from,
        to_step = to,
        "Workflow step changed"
    );
}

/// Log an edit-and-rewind
pub fn log_rewind(workflow_id: &str, message_id: &str, discarded: usize, step: u32) {
    info!(
        workflow_id = workflow_id,
        message_id = message_id,
        discarded = discarded,
        step = step,
        "Transcript rewound"
    );
}

/// Log a panel selection submitted by the user
pub fn log_selection(workflow_id: &str, step: u32, summary: &str) {
    debug!(
        workflow_id = workflow_id,
        step = step,
        summary = summary,
        "Panel selection submitted"
    );
}

/// Log a proxied conversion request outcome
pub fn log_proxy_request(request_id: &str, chart_type: &str, status: u16, duration_ms: u64) {
    if status < 400 {
        info!(
            request_id = request_id,
            chart_type = chart_type,
            status = status,
            duration_ms = duration_ms,
            "Chart-to-Excel request completed"
        );
    } else {
        warn!(
            request_id = request_id,
            chart_type = chart_type,
            status = status,
            duration_ms = duration_ms,
            "Chart-to-Excel request failed"
        );
    }
}

/// Log API errors with their severity and context
pub fn log_api_error(api: &str, error: &WizardError, context: Option<&str>) {
    error!(
        api = api,
        error = %error,
        severity = %error.severity(),
        recoverable = error.is_recoverable(),
        context = context,
        "API error occurred"
    );
}

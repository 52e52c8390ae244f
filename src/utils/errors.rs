//! Error handling for FinWizard
//!
//! This module defines the main error types used throughout the crate
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for FinWizard
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Chart-to-Excel error: {0}")]
    ChartToExcel(#[from] ChartToExcelError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Unknown workflow: {0}")]
    UnknownWorkflow(String),

    #[error("Invalid workflow '{workflow_id}': {reason}")]
    InvalidWorkflow { workflow_id: String, reason: String },

    #[error("Invalid selection for step {step}: {reason}")]
    InvalidSelection { step: u32, reason: String },

    #[error("No customization panel is active")]
    NoActiveCustomization,

    #[error("A submission is still being processed")]
    ProcessingInProgress,

    #[error("Nothing is pending")]
    NothingPending,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Chart-to-Excel conversion service errors
#[derive(Error, Debug)]
pub enum ChartToExcelError {
    #[error("Conversion service returned HTTP {status}")]
    Upstream {
        status: reqwest::StatusCode,
        body: serde_json::Value,
    },

    #[error("Conversion service timeout")]
    Timeout,

    #[error("Conversion service unavailable")]
    ServiceUnavailable,

    #[error("Conversion request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid conversion request: {0}")]
    InvalidRequest(String),

    #[error("Invalid conversion response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for FinWizard operations
pub type Result<T> = std::result::Result<T, WizardError>;

/// Result type alias for chart-to-Excel operations
pub type ChartToExcelResult<T> = std::result::Result<T, ChartToExcelError>;

impl WizardError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            WizardError::ChartToExcel(e) => e.is_recoverable(),
            WizardError::Config(_) => false,
            WizardError::ConfigLoad(_) => false,
            WizardError::UnknownWorkflow(_) => false,
            WizardError::InvalidWorkflow { .. } => false,
            WizardError::InvalidSelection { .. } => true,
            WizardError::NoActiveCustomization => true,
            WizardError::ProcessingInProgress => true,
            WizardError::NothingPending => true,
            WizardError::Http(_) => true,
            WizardError::Serialization(_) => false,
            WizardError::UrlParse(_) => false,
            WizardError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            WizardError::Config(_) => ErrorSeverity::Critical,
            WizardError::ConfigLoad(_) => ErrorSeverity::Critical,
            WizardError::InvalidWorkflow { .. } => ErrorSeverity::Critical,
            WizardError::InvalidSelection { .. } => ErrorSeverity::Info,
            WizardError::InvalidInput(_) => ErrorSeverity::Info,
            WizardError::NoActiveCustomization => ErrorSeverity::Warning,
            WizardError::ProcessingInProgress => ErrorSeverity::Warning,
            WizardError::NothingPending => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

impl ChartToExcelError {
    /// Timeouts, connectivity problems and upstream 5xx may succeed on a later attempt
    pub fn is_recoverable(&self) -> bool {
        match self {
            ChartToExcelError::Upstream { status, .. } => status.is_server_error(),
            ChartToExcelError::Timeout => true,
            ChartToExcelError::ServiceUnavailable => true,
            ChartToExcelError::RequestFailed(_) => true,
            ChartToExcelError::InvalidRequest(_) => false,
            ChartToExcelError::InvalidResponse(_) => false,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{WizardError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_workflow_settings(&settings.workflow)?;
    validate_chart_to_excel_config(&settings.chart_to_excel)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate workflow selection
fn validate_workflow_settings(config: &super::WorkflowSettings) -> Result<()> {
    if config.default_workflow.trim().is_empty() {
        return Err(WizardError::Config(
            "Default workflow is required".to_string()
        ));
    }

    Ok(())
}

/// Validate chart-to-Excel configuration
fn validate_chart_to_excel_config(config: &super::ChartToExcelConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(WizardError::Config(
            "Chart-to-Excel API URL is required".to_string()
        ));
    }

    let parsed = url::Url::parse(&config.api_url)?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(WizardError::Config(
            format!("Chart-to-Excel API URL must be http(s), got '{}'", parsed.scheme())
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(WizardError::Config(
            "Chart-to-Excel timeout must be greater than 0".to_string()
        ));
    }

    if matches!(config.api_key.as_deref(), Some(key) if key.trim().is_empty()) {
        return Err(WizardError::Config(
            "Chart-to-Excel API key must not be blank when set".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(WizardError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(WizardError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

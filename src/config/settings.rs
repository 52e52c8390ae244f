//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub workflow: WorkflowSettings,
    pub chart_to_excel: ChartToExcelConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// Which workflow a new session runs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowSettings {
    pub default_workflow: String,
}

/// Remote chart-to-Excel conversion service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChartToExcelConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for daily-rolling log files; stdout only when absent
    pub file_path: Option<String>,
    pub json: bool,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub chart_export: bool,
    /// Pause the UI layer should insert between a submission and its reply
    pub mock_processing_delay_ms: u64,
}

impl FeaturesConfig {
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.mock_processing_delay_ms)
    }
}

impl Settings {
    /// Load settings from configuration file and environment variables
    ///
    /// Environment variables use the `FINWIZARD` prefix with `__` as the
    /// section separator, e.g. `FINWIZARD__LOGGING__LEVEL=debug`.
    pub fn new() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("FINWIZARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load settings from an explicit file, layered over the defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::from(path.as_ref()))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::WizardError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workflow: WorkflowSettings {
                default_workflow: crate::state::workflows::FINANCIAL_ANALYSIS_WORKFLOW.to_string(),
            },
            chart_to_excel: ChartToExcelConfig {
                api_url: "https://api.chart-to-excel.example.com/v1".to_string(),
                api_key: None,
                timeout_seconds: 30,
                user_agent: "FinWizard/1.0".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                json: false,
            },
            features: FeaturesConfig {
                chart_export: true,
                mock_processing_delay_ms: 1500,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.workflow.default_workflow, "financial_analysis");
        assert!(settings.chart_to_excel.api_key.is_none());
        assert_eq!(settings.features.processing_delay(), Duration::from_millis(1500));
    }
}

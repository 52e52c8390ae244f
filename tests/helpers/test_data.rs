//! Test data fixtures
//!
//! Panel selections and settings used across the integration tests.

use FinWizard::config::Settings;
use FinWizard::state::PanelSelection;

pub fn company_selection(company: &str) -> PanelSelection {
    PanelSelection::Company {
        industry: "Financial Services".to_string(),
        company: company.to_string(),
    }
}

pub fn data_sources_selection() -> PanelSelection {
    PanelSelection::DataSources {
        sources: vec![
            "Quarterly Filings (10-Q)".to_string(),
            "Earnings Call Transcripts".to_string(),
        ],
    }
}

pub fn metrics_selection() -> PanelSelection {
    PanelSelection::MetricsAndCharts {
        metrics: vec![
            "Return on Equity".to_string(),
            "Debt to Equity".to_string(),
            "Free Cash Flow".to_string(),
        ],
        charts: vec!["Line Chart".to_string(), "Waterfall Chart".to_string()],
    }
}

/// Settings pointing the proxy at a mock server
pub fn settings_for(api_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.chart_to_excel.api_url = api_url.to_string();
    settings.chart_to_excel.timeout_seconds = 2;
    settings
}

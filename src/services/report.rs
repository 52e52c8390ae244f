//! Mock analysis report
//!
//! Reports are canned: values are derived deterministically from the
//! selections so the same choices always render the same figures. No real
//! financial data is read.

use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::state::content::PanelSelection;
use crate::state::workflows::WorkflowConfig;
use crate::utils::errors::{WizardError, Result};
use crate::utils::helpers::normalize_whitespace;

/// Final report shown at the end of a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub title: String,
    pub company: String,
    pub industry: String,
    pub data_sources: Vec<String>,
    pub metrics: Vec<MetricValue>,
    pub charts: Vec<ChartSpec>,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}

/// One computed metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub name: String,
    pub value: f64,
    pub unit: String,
    /// Change against the prior period, in percentage points
    pub change: f64,
}

/// A chart to render over the selected metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub chart_type: String,
    pub title: String,
    pub series: Vec<String>,
}

/// Build the report for a completed set of selections, keyed by step number
pub fn generate_report<C>(
    workflow: &WorkflowConfig<C>,
    selections: &BTreeMap<u32, PanelSelection>,
) -> Result<AnalysisReport> {
    let mut company = None;
    let mut data_sources = Vec::new();
    let mut metric_names = Vec::new();
    let mut chart_types = Vec::new();

    for selection in selections.values() {
        match selection {
            PanelSelection::Company { industry, company: name } => {
                company = Some((normalize_whitespace(name), industry.clone()));
            }
            PanelSelection::DataSources { sources } => data_sources = sources.clone(),
            PanelSelection::MetricsAndCharts { metrics, charts } => {
                metric_names = metrics.clone();
                chart_types = charts.clone();
            }
        }
    }

    let (company, industry) = company.ok_or_else(|| {
        WizardError::InvalidInput(format!("Workflow '{}' has no company selection", workflow.id))
    })?;

    let metrics: Vec<MetricValue> = metric_names
        .iter()
        .map(|name| mock_metric(&company, name))
        .collect();

    let charts = chart_types
        .iter()
        .map(|chart_type| ChartSpec {
            chart_type: chart_type.clone(),
            title: format!("{}: {}", company, chart_type),
            series: metric_names.clone(),
        })
        .collect();

    let improving = metrics.iter().filter(|m| m.change >= 0.0).count();
    let summary = format!(
        "{} ({}) shows improvement in {} of {} tracked metrics, based on {} data source(s).",
        company,
        industry,
        improving,
        metrics.len(),
        data_sources.len()
    );

    Ok(AnalysisReport {
        title: format!("{}: {} Report", company, workflow.title),
        company,
        industry,
        data_sources,
        metrics,
        charts,
        summary,
        generated_at: Utc::now(),
    })
}

/// Canned baseline per metric
fn metric_profile(name: &str) -> (f64, &'static str) {
    match name {
        "Revenue Growth" => (8.5, "%"),
        "Gross Margin" => (42.0, "%"),
        "Operating Margin" => (18.0, "%"),
        "EBITDA" => (1250.0, "USD m"),
        "Free Cash Flow" => (640.0, "USD m"),
        "Return on Equity" => (14.5, "%"),
        "Debt to Equity" => (0.8, "x"),
        "P/E Ratio" => (21.0, "x"),
        _ => (10.0, ""),
    }
}

fn mock_metric(company: &str, name: &str) -> MetricValue {
    let (base, unit) = metric_profile(name);
    let seed = company
        .bytes()
        .chain(name.bytes())
        .fold(17u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));

    // Spread +/-20% around the baseline, change within +/-5 points.
    let scale = 0.8 + f64::from(seed % 41) / 100.0;
    let change = f64::from((seed / 41) % 101) / 10.0 - 5.0;

    MetricValue {
        name: name.to_string(),
        value: (base * scale * 100.0).round() / 100.0,
        unit: unit.to_string(),
        change: (change * 10.0).round() / 10.0,
    }
}

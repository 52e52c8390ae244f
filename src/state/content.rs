//! Message payloads used by wizard sessions
//!
//! The engine is generic over content; sessions use [`MessageContent`].

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::services::report::AnalysisReport;
use crate::utils::helpers::{join_human_list, normalize_whitespace};
use super::workflows::{PanelKind, WorkflowStep};

/// What a session message displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum MessageContent {
    Text(String),
    Panel(PanelPrompt),
    Report(AnalysisReport),
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageContent::Text(text) => f.write_str(text),
            MessageContent::Panel(panel) => f.write_str(&panel.prompt),
            MessageContent::Report(report) => f.write_str(&report.title),
        }
    }
}

/// Prompt and choices for a customization panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelPrompt {
    pub step: u32,
    pub kind: PanelKind,
    pub prompt: String,
    pub options: Vec<String>,
    pub secondary_options: Vec<String>,
}

impl PanelPrompt {
    pub fn for_step(step: &WorkflowStep, prompt: impl Into<String>) -> Self {
        Self {
            step: step.number,
            kind: step.panel,
            prompt: prompt.into(),
            options: step.options.clone(),
            secondary_options: step.secondary_options.clone(),
        }
    }
}

/// Result handed back by a panel's "Continue" action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum PanelSelection {
    Company { industry: String, company: String },
    DataSources { sources: Vec<String> },
    MetricsAndCharts { metrics: Vec<String>, charts: Vec<String> },
}

impl PanelSelection {
    /// Panel kind this selection answers
    pub fn kind(&self) -> PanelKind {
        match self {
            PanelSelection::Company { .. } => PanelKind::CompanySelection,
            PanelSelection::DataSources { .. } => PanelKind::DataSources,
            PanelSelection::MetricsAndCharts { .. } => PanelKind::MetricsAndCharts,
        }
    }

    /// One-line text echoed into the transcript as the user's reply
    pub fn summary(&self) -> String {
        match self {
            PanelSelection::Company { industry, company } => {
                format!("Analyze {} ({})", normalize_whitespace(company), industry)
            }
            PanelSelection::DataSources { sources } => {
                format!("Use {}", join_human_list(sources))
            }
            PanelSelection::MetricsAndCharts { metrics, charts } if charts.is_empty() => {
                format!("Track {}", join_human_list(metrics))
            }
            PanelSelection::MetricsAndCharts { metrics, charts } => {
                format!("Track {} with {}", join_human_list(metrics), join_human_list(charts))
            }
        }
    }
}

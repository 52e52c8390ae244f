//! Workflow definitions
//!
//! This module defines the wizard workflows a session can walk through: the
//! ordered steps, which customization panel each step shows and the options
//! those panels offer. The engine only sees step numbers; the step graph lives
//! here and is driven by the session layer.

use std::collections::HashMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::utils::errors::{WizardError, Result};
use super::content::{MessageContent, PanelPrompt, PanelSelection};

/// Id of the built-in financial analysis workflow
pub const FINANCIAL_ANALYSIS_WORKFLOW: &str = "financial_analysis";

/// Kind of customization panel a step shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    CompanySelection,
    DataSources,
    MetricsAndCharts,
    /// Final report, no interactive panel
    Report,
}

impl PanelKind {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PanelKind::Report)
    }
}

/// A step within a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// 1-based position in the workflow
    pub number: u32,
    pub id: String,
    pub name: String,
    pub description: String,
    pub panel: PanelKind,
    /// Primary choices offered by the panel (industries, sources, metrics)
    pub options: Vec<String>,
    /// Secondary choices (chart types for the metrics panel)
    pub secondary_options: Vec<String>,
    pub min_selections: usize,
    pub max_selections: Option<usize>,
}

/// A complete workflow definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig<C = MessageContent> {
    pub id: String,
    pub title: String,
    pub description: String,
    pub steps: Vec<WorkflowStep>,
    /// Content of the welcome message shown by `initialize`
    pub initial_message: C,
}

impl<C> WorkflowConfig<C> {
    /// Get a step by its number
    pub fn step(&self, number: u32) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.number == number)
    }

    pub fn first_step(&self) -> Option<&WorkflowStep> {
        self.step(1)
    }

    /// The step following `number`, if any
    pub fn next_step(&self, number: u32) -> Option<&WorkflowStep> {
        self.step(number + 1)
    }

    pub fn is_terminal(&self, number: u32) -> bool {
        self.step(number).map_or(false, |s| s.panel.is_terminal())
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Convert the welcome content, keeping everything else
    pub fn map_initial_message<D>(self, f: impl FnOnce(C) -> D) -> WorkflowConfig<D> {
        WorkflowConfig {
            id: self.id,
            title: self.title,
            description: self.description,
            steps: self.steps,
            initial_message: f(self.initial_message),
        }
    }
}

const ID_PATTERN: &str = r"^[a-z][a-z0-9_]*$";
const COMPANY_PATTERN: &str = r"^[\p{L}\p{N}&.,'()\- ]{2,100}$";

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|_| WizardError::Config("Invalid regex pattern".to_string()))
}

/// Check that a workflow is well formed
///
/// Steps must be numbered 1..=n without gaps, ids must be unique snake_case
/// identifiers and the only terminal step must be the last one.
pub fn validate_workflow<C>(config: &WorkflowConfig<C>) -> Result<()> {
    let invalid = |reason: String| WizardError::InvalidWorkflow {
        workflow_id: config.id.clone(),
        reason,
    };

    let id_pattern = compile(ID_PATTERN)?;
    if !id_pattern.is_match(&config.id) {
        return Err(invalid(format!("workflow id '{}' is not snake_case", config.id)));
    }

    if config.steps.is_empty() {
        return Err(invalid("workflow has no steps".to_string()));
    }

    let mut seen_ids = std::collections::HashSet::new();
    for (index, step) in config.steps.iter().enumerate() {
        let expected = index as u32 + 1;
        if step.number != expected {
            return Err(invalid(format!(
                "step '{}' is numbered {} but should be {}", step.id, step.number, expected
            )));
        }
        if !id_pattern.is_match(&step.id) {
            return Err(invalid(format!("step id '{}' is not snake_case", step.id)));
        }
        if !seen_ids.insert(step.id.as_str()) {
            return Err(invalid(format!("duplicate step id '{}'", step.id)));
        }
        let is_last = index + 1 == config.steps.len();
        if step.panel.is_terminal() != is_last {
            return Err(invalid(format!(
                "step '{}': exactly the last step must be the report", step.id
            )));
        }
        if let Some(max) = step.max_selections {
            if max < step.min_selections {
                return Err(invalid(format!(
                    "step '{}': max_selections {} below min_selections {}",
                    step.id, max, step.min_selections
                )));
            }
        }
    }

    Ok(())
}

impl WorkflowStep {
    /// Validate a panel result against this step's panel
    pub fn validate_selection(&self, selection: &PanelSelection) -> Result<()> {
        let invalid = |reason: String| WizardError::InvalidSelection {
            step: self.number,
            reason,
        };

        if selection.kind() != self.panel {
            return Err(invalid(format!(
                "expected a {:?} selection, got {:?}", self.panel, selection.kind()
            )));
        }

        match selection {
            PanelSelection::Company { industry, company } => {
                if !self.options.contains(industry) {
                    return Err(invalid(format!(
                        "Unknown industry '{}'. Available options: {}", industry, self.options.join(", ")
                    )));
                }
                if !compile(COMPANY_PATTERN)?.is_match(company.trim()) {
                    return Err(invalid(
                        "Company name should be 2-100 characters".to_string()
                    ));
                }
            }
            PanelSelection::DataSources { sources } => {
                self.check_choices(sources, &self.options, "data source")?;
                self.check_count(sources.len())?;
            }
            PanelSelection::MetricsAndCharts { metrics, charts } => {
                self.check_choices(metrics, &self.options, "metric")?;
                self.check_choices(charts, &self.secondary_options, "chart type")?;
                self.check_count(metrics.len())?;
            }
        }

        Ok(())
    }

    fn check_choices(&self, chosen: &[String], allowed: &[String], what: &str) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for choice in chosen {
            if !allowed.contains(choice) {
                return Err(WizardError::InvalidSelection {
                    step: self.number,
                    reason: format!("Unknown {} '{}'", what, choice),
                });
            }
            if !seen.insert(choice) {
                return Err(WizardError::InvalidSelection {
                    step: self.number,
                    reason: format!("Duplicate {} '{}'", what, choice),
                });
            }
        }
        Ok(())
    }

    fn check_count(&self, count: usize) -> Result<()> {
        if count < self.min_selections {
            return Err(WizardError::InvalidSelection {
                step: self.number,
                reason: format!("Select at least {}", self.min_selections),
            });
        }
        if let Some(max) = self.max_selections {
            if count > max {
                return Err(WizardError::InvalidSelection {
                    step: self.number,
                    reason: format!("Select at most {}", max),
                });
            }
        }
        Ok(())
    }
}

/// Registry of the workflows available to new sessions
#[derive(Debug, Clone)]
pub struct WorkflowRegistry {
    workflows: HashMap<String, WorkflowConfig>,
}

impl WorkflowRegistry {
    /// Create a registry holding the built-in workflows
    pub fn new() -> Self {
        let mut registry = Self {
            workflows: HashMap::new(),
        };

        registry.workflows.insert(
            FINANCIAL_ANALYSIS_WORKFLOW.to_string(),
            create_financial_analysis_workflow(),
        );
        registry
    }

    /// Register a workflow, replacing any with the same id
    pub fn register_workflow(&mut self, workflow: WorkflowConfig) -> Result<()> {
        validate_workflow(&workflow)?;
        self.workflows.insert(workflow.id.clone(), workflow);
        Ok(())
    }

    pub fn get_workflow(&self, id: &str) -> Result<&WorkflowConfig> {
        self.workflows
            .get(id)
            .ok_or_else(|| WizardError::UnknownWorkflow(id.to_string()))
    }

    pub fn all_workflows(&self) -> Vec<&WorkflowConfig> {
        self.workflows.values().collect()
    }
}

impl Default for WorkflowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Create the built-in financial analysis workflow
pub fn create_financial_analysis_workflow() -> WorkflowConfig {
    let steps = vec![
        WorkflowStep {
            number: 1,
            id: "company_selection".to_string(),
            name: "Company Selection".to_string(),
            description: "Select the industry and the company to analyze".to_string(),
            panel: PanelKind::CompanySelection,
            options: strings(&[
                "Technology",
                "Healthcare",
                "Financial Services",
                "Energy",
                "Consumer Goods",
                "Industrials",
            ]),
            secondary_options: vec![],
            min_selections: 1,
            max_selections: Some(1),
        },
        WorkflowStep {
            number: 2,
            id: "data_sources".to_string(),
            name: "Data Sources".to_string(),
            description: "Choose the documents and feeds the analysis draws on".to_string(),
            panel: PanelKind::DataSources,
            options: strings(&[
                "Annual Reports (10-K)",
                "Quarterly Filings (10-Q)",
                "Earnings Call Transcripts",
                "Analyst Reports",
                "Market Data",
                "News & Press Releases",
            ]),
            secondary_options: vec![],
            min_selections: 1,
            max_selections: None,
        },
        WorkflowStep {
            number: 3,
            id: "metrics_and_charts".to_string(),
            name: "Metrics & Charts".to_string(),
            description: "Pick the metrics to compute and how to chart them".to_string(),
            panel: PanelKind::MetricsAndCharts,
            options: strings(&[
                "Revenue Growth",
                "Gross Margin",
                "Operating Margin",
                "EBITDA",
                "Free Cash Flow",
                "Return on Equity",
                "Debt to Equity",
                "P/E Ratio",
            ]),
            secondary_options: strings(&[
                "Line Chart",
                "Bar Chart",
                "Pie Chart",
                "Waterfall Chart",
                "Scatter Plot",
            ]),
            min_selections: 1,
            max_selections: Some(6),
        },
        WorkflowStep {
            number: 4,
            id: "report".to_string(),
            name: "Analysis Report".to_string(),
            description: "Review the generated report".to_string(),
            panel: PanelKind::Report,
            options: vec![],
            secondary_options: vec![],
            min_selections: 0,
            max_selections: None,
        },
    ];

    let initial_message = MessageContent::Panel(PanelPrompt::for_step(
        &steps[0],
        "Welcome! Let's build your financial analysis. Start by choosing an industry and a company.",
    ));

    WorkflowConfig {
        id: FINANCIAL_ANALYSIS_WORKFLOW.to_string(),
        title: "Financial Analysis".to_string(),
        description: "Guided company analysis ending in a summary report".to_string(),
        steps,
        initial_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_registry_has_builtin_workflow() {
        let registry = WorkflowRegistry::new();
        let workflow = registry.get_workflow(FINANCIAL_ANALYSIS_WORKFLOW).unwrap();
        assert_eq!(workflow.step_count(), 4);
        assert!(validate_workflow(workflow).is_ok());
        assert_matches!(registry.get_workflow("missing"), Err(WizardError::UnknownWorkflow(_)));
    }

    #[test]
    fn test_step_navigation() {
        let workflow = create_financial_analysis_workflow();
        assert_eq!(workflow.first_step().unwrap().id, "company_selection");
        assert_eq!(workflow.next_step(2).unwrap().id, "metrics_and_charts");
        assert!(workflow.next_step(4).is_none());
        assert!(workflow.is_terminal(4));
        assert!(!workflow.is_terminal(3));
        assert!(!workflow.is_terminal(99));
    }

    #[test]
    fn test_register_rejects_gapped_steps() {
        let mut workflow = create_financial_analysis_workflow();
        workflow.id = "gapped".to_string();
        workflow.steps.remove(1);

        let mut registry = WorkflowRegistry::new();
        assert_matches!(
            registry.register_workflow(workflow),
            Err(WizardError::InvalidWorkflow { .. })
        );
        assert_eq!(registry.all_workflows().len(), 1);
    }

    #[test]
    fn test_register_rejects_report_before_end() {
        let mut workflow = create_financial_analysis_workflow();
        workflow.id = "early_report".to_string();
        workflow.steps[1].panel = PanelKind::Report;
        assert!(validate_workflow(&workflow).is_err());
    }

    #[test]
    fn test_register_rejects_bad_ids() {
        let mut workflow = create_financial_analysis_workflow();
        workflow.id = "Not Snake".to_string();
        assert!(validate_workflow(&workflow).is_err());
    }

    #[test]
    fn test_company_selection_validation() {
        let workflow = create_financial_analysis_workflow();
        let step = workflow.step(1).unwrap();

        let ok = PanelSelection::Company {
            industry: "Technology".to_string(),
            company: "Acme Corp.".to_string(),
        };
        assert!(step.validate_selection(&ok).is_ok());

        let bad_industry = PanelSelection::Company {
            industry: "Farming".to_string(),
            company: "Acme".to_string(),
        };
        assert_matches!(
            step.validate_selection(&bad_industry),
            Err(WizardError::InvalidSelection { step: 1, .. })
        );

        let bad_company = PanelSelection::Company {
            industry: "Energy".to_string(),
            company: "X".to_string(),
        };
        assert!(step.validate_selection(&bad_company).is_err());
    }

    #[test]
    fn test_selection_kind_must_match_panel() {
        let workflow = create_financial_analysis_workflow();
        let step = workflow.step(2).unwrap();
        let wrong = PanelSelection::Company {
            industry: "Technology".to_string(),
            company: "Acme".to_string(),
        };
        assert!(step.validate_selection(&wrong).is_err());
    }

    #[test]
    fn test_multi_choice_validation() {
        let workflow = create_financial_analysis_workflow();
        let sources = workflow.step(2).unwrap();
        assert!(sources.validate_selection(&PanelSelection::DataSources { sources: vec![] }).is_err());
        assert!(sources
            .validate_selection(&PanelSelection::DataSources { sources: strings(&["Market Data"]) })
            .is_ok());
        assert!(sources
            .validate_selection(&PanelSelection::DataSources { sources: strings(&["Market Data", "Market Data"]) })
            .is_err());

        let metrics = workflow.step(3).unwrap();
        let too_many = PanelSelection::MetricsAndCharts {
            metrics: strings(&[
                "Revenue Growth", "Gross Margin", "Operating Margin",
                "EBITDA", "Free Cash Flow", "Return on Equity", "P/E Ratio",
            ]),
            charts: vec![],
        };
        assert!(metrics.validate_selection(&too_many).is_err());

        let unknown_chart = PanelSelection::MetricsAndCharts {
            metrics: strings(&["EBITDA"]),
            charts: strings(&["Radar Chart"]),
        };
        assert!(metrics.validate_selection(&unknown_chart).is_err());
    }

    #[test]
    fn test_map_initial_message() {
        let workflow = create_financial_analysis_workflow()
            .map_initial_message(|content| content.to_string());
        assert!(workflow.initial_message.starts_with("Welcome!"));
        assert_eq!(workflow.step_count(), 4);
    }
}

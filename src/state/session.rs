//! Wizard sessions
//!
//! A session drives a [`WorkflowEngine`] through a workflow's steps the way
//! the UI does: a panel's "Continue" echoes the user's choice, shows a loading
//! indicator while the caller waits, then advances the step and posts the
//! next panel or the final report.

use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};
use crate::config::Settings;
use crate::services::report::generate_report;
use crate::utils::errors::{WizardError, Result};
use crate::utils::helpers::truncate_text;
use crate::utils::logging::log_selection;
use super::content::{MessageContent, PanelPrompt, PanelSelection};
use super::engine::WorkflowEngine;
use super::message::{Message, MessageId, MessageRole};
use super::workflows::{validate_workflow, PanelKind, WorkflowConfig, WorkflowRegistry, WorkflowStep};

/// Text shown by the loading indicator after a submission
pub const PROCESSING_TEXT: &str = "Processing your selection...";

/// One user's walk through a workflow
#[derive(Debug, Clone)]
pub struct WizardSession {
    engine: WorkflowEngine<MessageContent>,
    /// Panel results keyed by the step they answered
    selections: BTreeMap<u32, PanelSelection>,
    /// Step whose submission awaits `complete_pending`
    pending: Option<u32>,
}

impl WizardSession {
    /// Start a session on a workflow
    pub fn new(workflow: WorkflowConfig) -> Result<Self> {
        validate_workflow(&workflow)?;

        let mut engine = WorkflowEngine::new(workflow);
        engine.initialize();
        info!(workflow_id = %engine.config().id, "Wizard session started");

        Ok(Self {
            engine,
            selections: BTreeMap::new(),
            pending: None,
        })
    }

    /// Start a session on a registered workflow
    pub fn from_registry(registry: &WorkflowRegistry, workflow_id: &str) -> Result<Self> {
        Self::new(registry.get_workflow(workflow_id)?.clone())
    }

    /// Start a session on the configured default workflow
    pub fn from_settings(registry: &WorkflowRegistry, settings: &Settings) -> Result<Self> {
        Self::from_registry(registry, &settings.workflow.default_workflow)
    }

    pub fn engine(&self) -> &WorkflowEngine<MessageContent> {
        &self.engine
    }

    pub fn workflow(&self) -> &WorkflowConfig {
        self.engine.config()
    }

    pub fn messages(&self) -> Vec<Message<MessageContent>> {
        self.engine.messages()
    }

    pub fn selections(&self) -> &BTreeMap<u32, PanelSelection> {
        &self.selections
    }

    pub fn is_processing(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the report step has been reached
    pub fn is_complete(&self) -> bool {
        self.workflow().is_terminal(self.engine.current_step())
    }

    /// Accept the active panel's result
    ///
    /// Appends the user's reply at the current step and shows the loading
    /// indicator. Call [`complete_pending`](Self::complete_pending) once the
    /// caller's processing pause is over.
    pub fn submit_selection(&mut self, selection: PanelSelection) -> Result<MessageId> {
        if self.pending.is_some() {
            return Err(WizardError::ProcessingInProgress);
        }
        if self.engine.active_customization().is_none() {
            return Err(WizardError::NoActiveCustomization);
        }

        let step_number = self.engine.current_step();
        let step = self.current_workflow_step()?;
        step.validate_selection(&selection)?;

        let summary = selection.summary();
        log_selection(&self.workflow().id, step_number, &truncate_text(&summary, 120));

        let id = self.engine.add_message(MessageRole::User, MessageContent::Text(summary), false);
        self.selections.retain(|step, _| *step < step_number);
        self.selections.insert(step_number, selection);
        self.engine.add_loading_message(MessageContent::Text(PROCESSING_TEXT.to_string()));
        self.pending = Some(step_number);

        Ok(id)
    }

    /// Change the loading indicator's text while a submission is pending
    pub fn update_progress(&mut self, text: impl Into<String>) {
        if self.pending.is_some() {
            self.engine.update_loading_message(MessageContent::Text(text.into()));
        }
    }

    /// Finish the pending submission and post what comes next
    pub fn complete_pending(&mut self) -> Result<MessageId> {
        let step_number = self.pending.ok_or(WizardError::NothingPending)?;
        let next = self
            .workflow()
            .next_step(step_number)
            .cloned()
            .ok_or_else(|| WizardError::InvalidWorkflow {
                workflow_id: self.workflow().id.clone(),
                reason: format!("no step follows step {}", step_number),
            })?;

        let content = if next.panel.is_terminal() {
            MessageContent::Report(generate_report(self.workflow(), &self.selections)?)
        } else {
            MessageContent::Panel(PanelPrompt::for_step(&next, panel_prompt(next.panel)))
        };

        self.pending = None;
        self.engine.remove_loading_message();
        self.engine.set_current_step(next.number);

        if next.panel.is_terminal() {
            let id = self.engine.add_message(MessageRole::System, content, false);
            self.engine.clear_active_customization();
            info!(workflow_id = %self.workflow().id, message_id = %id, "Report generated");
            Ok(id)
        } else {
            Ok(self.engine.add_message(MessageRole::System, content, true))
        }
    }

    /// Wait out the simulated processing pause, then complete
    pub async fn complete_after(&mut self, delay: Duration) -> Result<MessageId> {
        if self.pending.is_none() {
            return Err(WizardError::NothingPending);
        }
        tokio::time::sleep(delay).await;
        self.complete_pending()
    }

    /// Rewind to an earlier message so the user can redo from there
    ///
    /// Unknown ids are ignored. Selections for the step the transcript now
    /// sits at, and any later step, are forgotten.
    pub fn edit_message(&mut self, message_id: &MessageId) {
        if self.engine.find_message(message_id).is_none() {
            debug!(message_id = %message_id, "Ignoring edit of unknown message");
            return;
        }

        self.engine.handle_edit_message(message_id);
        self.pending = None;
        let step_number = self.engine.current_step();
        self.selections.retain(|step, _| *step < step_number);
    }

    /// Throw the transcript away and start over
    pub fn restart(&mut self) {
        self.engine.initialize();
        self.selections.clear();
        self.pending = None;
    }

    fn current_workflow_step(&self) -> Result<&WorkflowStep> {
        let step_number = self.engine.current_step();
        self.workflow().step(step_number).ok_or_else(|| WizardError::InvalidSelection {
            step: step_number,
            reason: "step is not part of the workflow".to_string(),
        })
    }
}

fn panel_prompt(kind: PanelKind) -> &'static str {
    match kind {
        PanelKind::CompanySelection => "Which industry and company should we analyze?",
        PanelKind::DataSources => "Great. Which data sources should the analysis use?",
        PanelKind::MetricsAndCharts => "Now choose the metrics to compute and how to chart them.",
        PanelKind::Report => "Here is your report.",
    }
}

//! Workflow engine
//!
//! The engine is the ledger behind a wizard session. It owns the transcript,
//! the current step number and the pointer to the one message whose
//! customization panel is active. It never decides which step comes next:
//! callers advance the step explicitly and the engine records history and
//! provides the edit-and-rewind primitive.

use chrono::Utc;
use tracing::debug;
use crate::utils::helpers::format_message_id;
use crate::utils::logging::{log_rewind, log_step_transition};
use super::message::{Message, MessageId, MessageRole};
use super::workflows::WorkflowConfig;

/// Transcript and step state for one wizard session
#[derive(Debug, Clone)]
pub struct WorkflowEngine<C> {
    config: WorkflowConfig<C>,
    current_step: u32,
    messages: Vec<Message<C>>,
    active_customization_id: Option<MessageId>,
    /// Loading indicator slot; rendered after the transcript, never stacked
    current_loading: Option<Message<C>>,
    next_sequence: u64,
}

impl<C: Clone> WorkflowEngine<C> {
    /// Create an engine with an empty transcript at step 1
    ///
    /// Call [`initialize`](Self::initialize) to post the welcome message.
    pub fn new(config: WorkflowConfig<C>) -> Self {
        Self {
            config,
            current_step: 1,
            messages: Vec::new(),
            active_customization_id: None,
            current_loading: None,
            next_sequence: 0,
        }
    }

    pub fn config(&self) -> &WorkflowConfig<C> {
        &self.config
    }

    /// Reset to a single welcome message whose panel is active
    pub fn initialize(&mut self) -> Vec<Message<C>> {
        self.messages.clear();
        self.current_loading = None;
        self.current_step = 1;

        let welcome = self.new_message(MessageRole::System, self.config.initial_message.clone(), true);
        self.active_customization_id = Some(welcome.id.clone());
        self.messages.push(welcome);

        debug!(workflow_id = %self.config.id, "Workflow session initialized");
        self.messages()
    }

    /// Append a message at the current step and return its id
    ///
    /// A system message with a panel becomes the active customization; a plain
    /// system message clears it. User and loading messages leave it alone.
    /// `show_customization` is ignored for non-system roles.
    pub fn add_message(&mut self, role: MessageRole, content: C, show_customization: bool) -> MessageId {
        let message = self.new_message(role, content, show_customization && role == MessageRole::System);
        let id = message.id.clone();

        if role == MessageRole::System {
            self.active_customization_id = message.show_customization.then(|| id.clone());
        }

        debug!(
            workflow_id = %self.config.id,
            message_id = %id,
            role = %role,
            step = message.step,
            show_customization = message.show_customization,
            "Message appended"
        );

        self.messages.push(message);
        id
    }

    /// Show the loading indicator, replacing any indicator already shown
    pub fn add_loading_message(&mut self, content: C) {
        let message = Message {
            id: MessageId::loading(),
            role: MessageRole::Loading,
            content,
            timestamp: Utc::now(),
            show_customization: false,
            step: self.current_step,
        };

        if self.current_loading.replace(message).is_some() {
            debug!(workflow_id = %self.config.id, "Loading indicator replaced");
        }
    }

    /// Replace the loading indicator's content; no-op when none is shown
    pub fn update_loading_message(&mut self, content: C) {
        if let Some(loading) = self.current_loading.as_mut() {
            loading.content = content;
        }
    }

    /// Remove the loading indicator; no-op when none is shown
    pub fn remove_loading_message(&mut self) {
        self.current_loading = None;
    }

    /// Set the step directly; not checked against the workflow's step list
    pub fn set_current_step(&mut self, step: u32) {
        if step != self.current_step {
            log_step_transition(&self.config.id, self.current_step, step);
        }
        self.current_step = step;
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    /// Snapshot of the transcript, loading indicator last
    pub fn messages(&self) -> Vec<Message<C>> {
        self.iter_messages().cloned().collect()
    }

    /// Borrowing view of the transcript, loading indicator last
    pub fn iter_messages(&self) -> impl Iterator<Item = &Message<C>> {
        self.messages.iter().chain(self.current_loading.iter())
    }

    pub fn len(&self) -> usize {
        self.messages.len() + usize::from(self.current_loading.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn active_customization_id(&self) -> Option<&MessageId> {
        self.active_customization_id.as_ref()
    }

    /// The message whose panel is currently active
    pub fn active_customization(&self) -> Option<&Message<C>> {
        self.active_customization_id
            .as_ref()
            .and_then(|id| self.find_message(id))
    }

    pub fn loading_message(&self) -> Option<&Message<C>> {
        self.current_loading.as_ref()
    }

    /// Find a transcript message by id (the loading indicator is not included)
    pub fn find_message(&self, id: &MessageId) -> Option<&Message<C>> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Hide any active panel, e.g. once the final report is shown
    pub fn clear_active_customization(&mut self) {
        self.active_customization_id = None;
    }

    /// Edit-and-rewind to `message_id`
    ///
    /// Everything after the message is discarded, the step resets to the
    /// message's step and the active panel is derived again. Unknown ids are
    /// ignored silently.
    pub fn handle_edit_message(&mut self, message_id: &MessageId) {
        let Some(index) = self.messages.iter().position(|m| &m.id == message_id) else {
            debug!(workflow_id = %self.config.id, message_id = %message_id, "Edit target not found");
            return;
        };

        let discarded = self.messages.len() - index - 1;
        self.messages.truncate(index + 1);
        self.current_loading = None;

        let target = &self.messages[index];
        self.current_step = target.step;

        if target.carries_customization() {
            self.active_customization_id = Some(target.id.clone());
        } else if target.role == MessageRole::User {
            self.active_customization_id = self.messages[..index]
                .iter()
                .rev()
                .find(|m| m.carries_customization())
                .map(|m| m.id.clone());
        } else {
            // Plain system and loading targets keep the previous pointer
            // unless it pointed into the discarded tail, so it never dangles.
            let still_present = self
                .active_customization_id
                .as_ref()
                .map_or(true, |id| self.messages.iter().any(|m| &m.id == id));
            if !still_present {
                self.active_customization_id = None;
            }
        }

        log_rewind(&self.config.id, message_id.as_str(), discarded, self.current_step);
    }

    fn new_message(&mut self, role: MessageRole, content: C, show_customization: bool) -> Message<C> {
        let timestamp = Utc::now();
        let id = MessageId::new(format_message_id(timestamp, self.next_sequence));
        self.next_sequence += 1;

        Message {
            id,
            role,
            content,
            timestamp,
            show_customization,
            step: self.current_step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::workflows::create_financial_analysis_workflow;

    fn engine() -> WorkflowEngine<String> {
        let config = create_financial_analysis_workflow().map_initial_message(|c| c.to_string());
        WorkflowEngine::new(config)
    }

    #[test]
    fn test_new_engine_is_empty() {
        let engine = engine();
        assert!(engine.is_empty());
        assert_eq!(engine.current_step(), 1);
        assert!(engine.active_customization_id().is_none());
    }

    #[test]
    fn test_initialize() {
        let mut engine = engine();
        let messages = engine.initialize();

        assert_eq!(messages.len(), 1);
        let welcome = &messages[0];
        assert_eq!(welcome.role, MessageRole::System);
        assert!(welcome.show_customization);
        assert_eq!(welcome.step, 1);
        assert_eq!(welcome.content, engine.config().initial_message);
        assert_eq!(engine.active_customization_id(), Some(&welcome.id));
    }

    #[test]
    fn test_initialize_restarts_session() {
        let mut engine = engine();
        engine.initialize();
        engine.add_message(MessageRole::User, "Acme".to_string(), false);
        engine.set_current_step(3);
        engine.add_loading_message("Thinking".to_string());

        let messages = engine.initialize();
        assert_eq!(messages.len(), 1);
        assert_eq!(engine.current_step(), 1);
        assert!(engine.loading_message().is_none());
        assert_eq!(engine.active_customization_id(), Some(&messages[0].id));
    }

    #[test]
    fn test_add_message_active_customization_rules() {
        let mut engine = engine();
        engine.initialize();

        let panel = engine.add_message(MessageRole::System, "Pick sources".to_string(), true);
        assert_eq!(engine.active_customization_id(), Some(&panel));

        engine.add_message(MessageRole::User, "reply".to_string(), false);
        assert_eq!(engine.active_customization_id(), Some(&panel));

        engine.add_message(MessageRole::Loading, "working".to_string(), false);
        assert_eq!(engine.active_customization_id(), Some(&panel));

        engine.add_message(MessageRole::System, "Note".to_string(), false);
        assert!(engine.active_customization_id().is_none());
    }

    #[test]
    fn test_show_customization_only_kept_for_system() {
        let mut engine = engine();
        engine.initialize();
        let before = engine.active_customization_id().cloned();

        let id = engine.add_message(MessageRole::User, "reply".to_string(), true);
        assert!(!engine.find_message(&id).unwrap().show_customization);
        assert_eq!(engine.active_customization_id().cloned(), before);
    }

    #[test]
    fn test_messages_record_current_step() {
        let mut engine = engine();
        engine.initialize();
        engine.set_current_step(2);
        let id = engine.add_message(MessageRole::System, "step two".to_string(), true);
        assert_eq!(engine.find_message(&id).unwrap().step, 2);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut engine = engine();
        engine.initialize();
        let mut ids: Vec<_> = (0..200)
            .map(|i| engine.add_message(MessageRole::User, i.to_string(), false))
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_loading_slot() {
        let mut engine = engine();
        engine.initialize();
        let before = engine.messages();

        engine.update_loading_message("ignored".to_string());
        assert_eq!(engine.messages(), before);

        engine.add_loading_message("Analyzing".to_string());
        engine.add_loading_message("Analyzing again".to_string());
        assert_eq!(engine.len(), 2);

        engine.update_loading_message("Almost done".to_string());
        let last = engine.messages().pop().unwrap();
        assert_eq!(last.id, MessageId::loading());
        assert_eq!(last.content, "Almost done");

        engine.remove_loading_message();
        engine.remove_loading_message();
        assert_eq!(engine.messages(), before);
    }

    #[test]
    fn test_edit_unknown_id_is_noop() {
        let mut engine = engine();
        engine.initialize();
        engine.add_message(MessageRole::User, "X".to_string(), false);
        engine.set_current_step(2);
        let before = engine.messages();

        engine.handle_edit_message(&MessageId::new("missing"));
        engine.handle_edit_message(&MessageId::loading());

        assert_eq!(engine.messages(), before);
        assert_eq!(engine.current_step(), 2);
        assert_eq!(engine.active_customization_id(), Some(&before[0].id));
    }

    #[test]
    fn test_edit_user_message_rewinds_to_prior_panel() {
        let mut engine = engine();
        let welcome = engine.initialize().remove(0);
        let user = engine.add_message(MessageRole::User, "X".to_string(), false);
        engine.set_current_step(2);
        engine.add_message(MessageRole::System, "Y".to_string(), true);
        engine.add_loading_message("busy".to_string());

        engine.handle_edit_message(&user);

        let messages = engine.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].id, user);
        assert_eq!(engine.current_step(), 1);
        assert_eq!(engine.active_customization_id(), Some(&welcome.id));
        assert!(engine.loading_message().is_none());
    }

    #[test]
    fn test_edit_user_message_without_prior_panel_clears() {
        let mut engine = engine();
        let user = engine.add_message(MessageRole::User, "first".to_string(), false);
        engine.add_message(MessageRole::System, "panel".to_string(), true);

        engine.handle_edit_message(&user);
        assert!(engine.active_customization_id().is_none());
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_edit_panel_message_makes_it_active() {
        let mut engine = engine();
        engine.initialize();
        engine.set_current_step(2);
        let panel = engine.add_message(MessageRole::System, "sources".to_string(), true);
        engine.add_message(MessageRole::User, "10-K".to_string(), false);
        engine.set_current_step(3);
        engine.add_message(MessageRole::System, "metrics".to_string(), true);

        engine.handle_edit_message(&panel);
        assert_eq!(engine.active_customization_id(), Some(&panel));
        assert_eq!(engine.current_step(), 2);
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_edit_plain_system_message_keeps_pointer() {
        // Suspected oversight in the old rewind rules: plain system and loading
        // targets left the pointer untouched even when it named a discarded
        // message. Here the pointer is kept only while it still resolves.
        let mut engine = engine();
        let welcome = engine.initialize().remove(0);
        let loading = engine.add_message(MessageRole::Loading, "working".to_string(), false);
        engine.add_message(MessageRole::User, "X".to_string(), false);

        engine.handle_edit_message(&loading);
        assert_eq!(engine.active_customization_id(), Some(&welcome.id));

        let note = engine.add_message(MessageRole::System, "note".to_string(), false);
        engine.add_message(MessageRole::System, "panel".to_string(), true);
        engine.handle_edit_message(&note);
        assert!(engine.active_customization_id().is_none());
        assert_eq!(engine.messages().last().unwrap().id, note);
    }

    #[test]
    fn test_clear_active_customization() {
        let mut engine = engine();
        engine.clear_active_customization();
        assert!(engine.active_customization_id().is_none());

        engine.initialize();
        engine.clear_active_customization();
        assert!(engine.active_customization_id().is_none());
        assert!(engine.active_customization().is_none());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut engine = engine();
        engine.initialize();
        let mut snapshot = engine.messages();
        snapshot.clear();
        assert_eq!(engine.len(), 1);
    }
}

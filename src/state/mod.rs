//! State management module
//!
//! This module holds the workflow engine and the session layer built on it:
//! transcript messages, workflow definitions and wizard sessions.

pub mod content;
pub mod engine;
pub mod message;
pub mod session;
pub mod workflows;

// Re-export commonly used state components
pub use content::{MessageContent, PanelPrompt, PanelSelection};
pub use engine::WorkflowEngine;
pub use message::{Message, MessageId, MessageRole, LOADING_MESSAGE_ID};
pub use session::WizardSession;
pub use workflows::{PanelKind, WorkflowConfig, WorkflowRegistry, WorkflowStep, FINANCIAL_ANALYSIS_WORKFLOW};

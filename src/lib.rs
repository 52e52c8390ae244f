//! FinWizard
//!
//! Workflow engine behind a chat-style financial analysis wizard. The engine
//! records the conversation transcript, the current step and which message's
//! customization panel is active, and supports editing a past message by
//! rewinding the transcript to it. Around it sit workflow definitions, a
//! session layer that walks a user through the steps to a mock report, and a
//! proxy for the remote chart-to-Excel conversion service.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{WizardError, Result};

// Re-export main components for easy access
pub use handlers::ChartToExcelProxy;
pub use services::ChartToExcelService;
pub use state::{WizardSession, WorkflowEngine, WorkflowRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}

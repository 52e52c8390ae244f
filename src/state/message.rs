//! Transcript messages
//!
//! A message is one entry of the wizard conversation. Its content is generic:
//! the engine stores and hands it back without looking inside.

use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id reserved for the loading indicator
pub const LOADING_MESSAGE_ID: &str = "loading";

/// Unique message identifier within a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id carried by the loading indicator
    pub fn loading() -> Self {
        Self(LOADING_MESSAGE_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Who a message comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Loading,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Loading => write!(f, "loading"),
        }
    }
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message<C> {
    pub id: MessageId,
    pub role: MessageRole,
    pub content: C,
    /// Informational only; transcript order is authoritative
    pub timestamp: DateTime<Utc>,
    pub show_customization: bool,
    /// Workflow step active when the message was appended
    pub step: u32,
}

impl<C> Message<C> {
    /// Whether this message may own the active customization panel
    pub fn carries_customization(&self) -> bool {
        self.role == MessageRole::System && self.show_customization
    }

    pub fn is_loading(&self) -> bool {
        self.role == MessageRole::Loading
    }
}

//! Conversation message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Reply from the assistant, canned or remote.
    Assistant,
}

/// A single entry of the local conversation history.
///
/// Messages are immutable once created. The history only grows, except when
/// the server resets the session and the whole list is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique within a controller; sorts by creation time.
    pub id: String,
    /// Raw text as typed or received. Formatting happens at render time.
    pub text: String,
    pub role: MessageRole,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub(crate) fn new(seq: u64, text: impl Into<String>, role: MessageRole) -> Self {
        let timestamp = Utc::now();
        Self {
            id: format!("{}-{}", timestamp.timestamp_millis(), seq),
            text: text.into(),
            role,
            timestamp,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

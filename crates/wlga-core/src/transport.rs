//! Port to the external chat endpoint.
//!
//! The assistant itself lives behind one HTTP call. The controller only sees
//! this trait, so tests can substitute a mock and deployments can swap the
//! wire shape without touching session logic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One outgoing chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// The raw user input, untrimmed.
    pub text: String,
    /// The session the turn belongs to.
    pub session_id: String,
}

/// Body returned by the chat endpoint.
///
/// Both fields are optional on the wire. A missing reply together with a
/// different `session_id` is the server asking the client to start over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatResponse {
    /// Returns the reply text if present and non-empty.
    pub fn reply_text(&self) -> Option<&str> {
        self.response.as_deref().filter(|text| !text.is_empty())
    }

    /// Returns the new session id when this response is a session reset signal
    /// relative to `current_session_id`.
    pub fn reset_session_id(&self, current_session_id: &str) -> Option<&str> {
        if self.reply_text().is_some() {
            return None;
        }
        self.session_id
            .as_deref()
            .filter(|id| !id.is_empty() && *id != current_session_id)
    }
}

/// Sends chat turns to the assistant backend.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Performs one request/response round trip.
    ///
    /// Connection failures, non-success statuses and undecodable bodies are
    /// all reported as errors.
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_fields_are_optional() {
        let response: ChatResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response, ChatResponse::default());

        let response: ChatResponse =
            serde_json::from_str(r#"{"response":"Hi","extra":1}"#).unwrap();
        assert_eq!(response.reply_text(), Some("Hi"));
        assert_eq!(response.session_id, None);
    }

    #[test]
    fn test_empty_reply_is_absent() {
        let response = ChatResponse {
            response: Some(String::new()),
            session_id: None,
        };
        assert_eq!(response.reply_text(), None);
    }

    #[test]
    fn test_reset_session_id() {
        let reset = ChatResponse {
            response: None,
            session_id: Some("new-id".to_string()),
        };
        assert_eq!(reset.reset_session_id("old-id"), Some("new-id"));
        assert_eq!(reset.reset_session_id("new-id"), None);

        let with_reply = ChatResponse {
            response: Some("Hello".to_string()),
            session_id: Some("new-id".to_string()),
        };
        assert_eq!(with_reply.reset_session_id("old-id"), None);

        let empty_id = ChatResponse {
            response: None,
            session_id: Some(String::new()),
        };
        assert_eq!(empty_id.reset_session_id("old-id"), None);
    }
}

//! HttpChatTransport - JSON over HTTP POST to the assistant backend.
//!
//! Wire contract:
//! - Request: `POST <base_url><chat_path>` with `{ "<query_field>": text, "session_id": id }`
//! - Response: `{ "response"?: string, "session_id"?: string }`
//!
//! The name of the text field (`query` or `message`) depends on the deployment
//! and comes from [`QueryField`].

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use wlga_core::config::{ChatConfig, QueryField};
use wlga_core::error::{ChatError, Result};
use wlga_core::transport::{ChatRequest, ChatResponse, ChatTransport};

/// Transport that posts each chat turn to a fixed endpoint URL.
#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    client: Client,
    chat_url: String,
    query_field: QueryField,
    timeout: Duration,
}

impl HttpChatTransport {
    /// Creates a transport for the given endpoint URL.
    pub fn new(chat_url: impl Into<String>, query_field: QueryField, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            chat_url: chat_url.into(),
            query_field,
            timeout,
        }
    }

    /// Creates a transport from the resolved client configuration.
    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.chat_url(), config.api.query_field, config.timeout())
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Builds the JSON body for one turn.
    pub fn request_body(&self, request: &ChatRequest) -> Value {
        let mut body = Map::new();
        body.insert(
            self.query_field.field_name().to_string(),
            Value::String(request.text.clone()),
        );
        body.insert(
            "session_id".to_string(),
            Value::String(request.session_id.clone()),
        );
        Value::Object(body)
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(url = %self.chat_url, session_id = %request.session_id, "Posting chat turn");

        let response = self
            .client
            .post(&self.chat_url)
            .json(&self.request_body(request))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ChatError::transport(format!("Chat request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ChatError::http_status(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ChatError::transport(format!("Failed to read chat response: {}", e)))?;

        Ok(serde_json::from_str::<ChatResponse>(&body)?)
    }
}

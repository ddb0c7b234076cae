//! Client configuration model.
//!
//! Loading (file + environment) lives in the infrastructure crate; this module
//! only defines the shape and the defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ChatError;

/// Production endpoint used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://54.221.45.105:5000";
pub const DEFAULT_CHAT_PATH: &str = "/chat";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CANNED_REPLY_DELAY_MS: u64 = 1000;
/// Storage key under which the session id is persisted.
pub const DEFAULT_SESSION_KEY: &str = "chat-session-id";

/// Deployment environment. Selects which base URL is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl FromStr for Environment {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ChatError::config(format!("Unknown environment: {}", other))),
        }
    }
}

/// Name of the request body field carrying the user's text.
///
/// Deployments disagree on this (`query` vs `message`), so it is configured
/// rather than hard-coded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryField {
    #[default]
    Query,
    Message,
}

impl QueryField {
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for QueryField {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "query" => Ok(Self::Query),
            "message" => Ok(Self::Message),
            other => Err(ChatError::config(format!("Unknown query field: {}", other))),
        }
    }
}

/// Chat endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Used instead of `base_url` in development when set.
    pub local_base_url: Option<String>,
    pub chat_path: String,
    pub query_field: QueryField,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            local_base_url: None,
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            query_field: QueryField::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Session controller settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Simulated latency before an identity canned reply is shown.
    pub canned_reply_delay_ms: u64,
    pub session_key: String,
}

impl ChatSettings {
    pub fn canned_reply_delay(&self) -> Duration {
        Duration::from_millis(self.canned_reply_delay_ms)
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            canned_reply_delay_ms: DEFAULT_CANNED_REPLY_DELAY_MS,
            session_key: DEFAULT_SESSION_KEY.to_string(),
        }
    }
}

/// Root configuration (`config.toml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub chat: ChatSettings,
}

impl ChatConfig {
    /// Returns the base URL for the current environment.
    pub fn base_url(&self) -> &str {
        match (self.environment, self.api.local_base_url.as_deref()) {
            (Environment::Development, Some(local)) if !local.is_empty() => local,
            _ => &self.api.base_url,
        }
    }

    /// Returns the full chat endpoint URL.
    pub fn chat_url(&self) -> String {
        let base = self.base_url().trim_end_matches('/');
        let path = self.api.chat_path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

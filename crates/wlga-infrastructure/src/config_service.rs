//! Configuration loading.
//!
//! Resolution order, later wins:
//! 1. Built-in defaults
//! 2. `config.toml` in the wlga-chat config directory (optional)
//! 3. Environment variables (`WLGA_ENV`, `WLGA_BASE_API`, `WLGA_LOCAL_BASE_API`,
//!    `WLGA_QUERY_FIELD`)

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use wlga_core::config::{ChatConfig, Environment, QueryField};
use wlga_core::error::{ChatError, Result};

use crate::paths::WlgaPaths;

pub const ENV_ENVIRONMENT: &str = "WLGA_ENV";
pub const ENV_BASE_API: &str = "WLGA_BASE_API";
pub const ENV_LOCAL_BASE_API: &str = "WLGA_LOCAL_BASE_API";
pub const ENV_QUERY_FIELD: &str = "WLGA_QUERY_FIELD";

/// Loads [`ChatConfig`] from file and environment.
#[derive(Debug, Clone)]
pub struct ConfigService {
    config_path: PathBuf,
}

impl ConfigService {
    pub fn new(paths: &WlgaPaths) -> Self {
        Self::with_path(paths.config_file())
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads the configuration using the process environment.
    pub fn load(&self) -> Result<ChatConfig> {
        self.load_with_env(|key| env::var(key).ok())
    }

    /// Loads the configuration with a custom environment lookup.
    pub fn load_with_env<F>(&self, lookup: F) -> Result<ChatConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self.load_file()?;
        apply_env_overrides(&mut config, lookup)?;
        tracing::debug!(chat_url = %config.chat_url(), "Resolved chat configuration");
        Ok(config)
    }

    /// Reads `config.toml`, falling back to defaults when it does not exist.
    pub fn load_file(&self) -> Result<ChatConfig> {
        match fs::read_to_string(&self.config_path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = ?self.config_path, "No config file, using defaults");
                Ok(ChatConfig::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn apply_env_overrides<F>(config: &mut ChatConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(environment) = non_empty(lookup(ENV_ENVIRONMENT)) {
        config.environment = environment
            .parse::<Environment>()
            .map_err(|e: ChatError| ChatError::config(format!("{}: {}", ENV_ENVIRONMENT, e)))?;
    }
    if let Some(base_url) = non_empty(lookup(ENV_BASE_API)) {
        config.api.base_url = base_url;
    }
    if let Some(local_base_url) = non_empty(lookup(ENV_LOCAL_BASE_API)) {
        config.api.local_base_url = Some(local_base_url);
    }
    if let Some(query_field) = non_empty(lookup(ENV_QUERY_FIELD)) {
        config.api.query_field = query_field
            .parse::<QueryField>()
            .map_err(|e: ChatError| ChatError::config(format!("{}: {}", ENV_QUERY_FIELD, e)))?;
    }
    Ok(())
}

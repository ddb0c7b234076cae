//! Unified path management for wlga-chat files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/wlga-chat/         # Config directory (platform dependent)
//! ├── config.toml              # Client configuration
//! └── chat-session-id          # Persisted session id
//! ```

use std::path::PathBuf;

use wlga_core::error::{ChatError, Result};

const APP_DIR_NAME: &str = "wlga-chat";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolves the locations of wlga-chat files.
///
/// The base directory is the platform config dir by default; tests point it
/// at a temporary directory with [`WlgaPaths::with_base_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WlgaPaths {
    base_dir: PathBuf,
}

impl WlgaPaths {
    /// Uses the platform config directory (e.g. `~/.config/wlga-chat/`).
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ChatError::config("Cannot find config directory"))?;
        Ok(Self::with_base_dir(config_dir.join(APP_DIR_NAME)))
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the path to `config.toml`.
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE_NAME)
    }

    /// Returns the file that stores the value for a storage key.
    pub fn key_file(&self, key: &str) -> PathBuf {
        self.base_dir.join(key)
    }
}

//! File-backed session id storage.
//!
//! One plain-text file holds the id, named after the storage key. The file is
//! overwritten wholesale on rotation; there is no schema or versioning.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use wlga_core::error::{ChatError, Result};
use wlga_core::session::SessionStore;

use crate::paths::WlgaPaths;

/// [`SessionStore`] persisting the session id to a single file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store writing to an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store for `key` under the wlga-chat config directory.
    pub fn for_key(paths: &WlgaPaths, key: &str) -> Self {
        Self::with_path(paths.key_file(key))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load_session_id(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let session_id = contents.trim();
                Ok((!session_id.is_empty()).then(|| session_id.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ChatError::storage(format!(
                "Failed to read session file {:?}: {}",
                self.path, err
            ))),
        }
    }

    fn save_session_id(&self, session_id: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                ChatError::storage(format!("Failed to create directory {:?}: {}", parent, err))
            })?;
        }

        // Replace atomically via a sibling temp file
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, session_id).map_err(|err| {
            ChatError::storage(format!("Failed to write session file {:?}: {}", tmp_path, err))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|err| {
            ChatError::storage(format!("Failed to replace session file {:?}: {}", self.path, err))
        })?;

        tracing::debug!(path = ?self.path, "Persisted session id");
        Ok(())
    }
}

//! Storage port for the persisted session id.

use std::sync::{Mutex, PoisonError};

use crate::error::Result;

/// Reads and writes the single persisted session id.
///
/// Access is synchronous: one read at initialization and one write whenever
/// the id is created or rotated.
pub trait SessionStore: Send + Sync {
    /// Returns the stored session id, or `None` if nothing is stored yet.
    fn load_session_id(&self) -> Result<Option<String>>;

    /// Overwrites the stored session id.
    fn save_session_id(&self, session_id: &str) -> Result<()>;
}

/// In-memory [`SessionStore`]. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session_id: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `session_id`.
    pub fn with_session_id(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Mutex::new(Some(session_id.into())),
        }
    }

    /// Returns the current value without going through the trait.
    pub fn current(&self) -> Option<String> {
        self.session_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load_session_id(&self) -> Result<Option<String>> {
        Ok(self.current())
    }

    fn save_session_id(&self, session_id: &str) -> Result<()> {
        *self
            .session_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(session_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load_session_id().unwrap(), None);

        store.save_session_id("abc").unwrap();
        assert_eq!(store.load_session_id().unwrap(), Some("abc".to_string()));

        store.save_session_id("def").unwrap();
        assert_eq!(store.current(), Some("def".to_string()));
    }
}

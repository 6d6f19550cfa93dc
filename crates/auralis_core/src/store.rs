use std::collections::HashMap;
use std::sync::Mutex;

use crate::{TabId, TabSession};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage io failed: {0}")]
    Io(String),
    #[error("stored session is malformed: {0}")]
    Format(String),
}

/// Persistent mapping from tab id to its session.
///
/// `save` replaces the whole record. `remove` is idempotent, and after it runs
/// `load` must hand back a default session so a reused tab id starts clean.
pub trait TabStore: Send + Sync {
    fn load(&self, tab_id: TabId) -> Result<TabSession, StoreError>;
    fn save(&self, tab_id: TabId, session: &TabSession) -> Result<(), StoreError>;
    fn remove(&self, tab_id: TabId) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryTabStore {
    sessions: Mutex<HashMap<TabId, TabSession>>,
}

impl MemoryTabStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<TabId, TabSession>>, StoreError> {
        self.sessions
            .lock()
            .map_err(|_| StoreError::Io("session map poisoned".to_string()))
    }
}

impl TabStore for MemoryTabStore {
    fn load(&self, tab_id: TabId) -> Result<TabSession, StoreError> {
        Ok(self.lock()?.get(&tab_id).cloned().unwrap_or_default())
    }

    fn save(&self, tab_id: TabId, session: &TabSession) -> Result<(), StoreError> {
        self.lock()?.insert(tab_id, session.clone());
        Ok(())
    }

    fn remove(&self, tab_id: TabId) -> Result<(), StoreError> {
        self.lock()?.remove(&tab_id);
        Ok(())
    }
}

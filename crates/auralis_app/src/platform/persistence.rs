use std::path::PathBuf;

use auralis_core::{StoreError, TabId, TabSession, TabStore};
use auralis_engine::{PersistError, RecordFiles};
use auralis_logging::auralis_debug;
use serde::{Deserialize, Serialize};

const RECORD_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedTab {
    version: u32,
    tab_id: TabId,
    session: TabSession,
}

/// Tab sessions stored as one RON record per tab, `tab-<id>.ron`.
#[derive(Debug, Clone)]
pub struct FileTabStore {
    records: RecordFiles,
}

impl FileTabStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            records: RecordFiles::new(dir),
        }
    }

    fn record_name(tab_id: TabId) -> String {
        format!("tab-{tab_id}.ron")
    }
}

fn io_error(err: PersistError) -> StoreError {
    StoreError::Io(err.to_string())
}

impl TabStore for FileTabStore {
    fn load(&self, tab_id: TabId) -> Result<TabSession, StoreError> {
        let name = Self::record_name(tab_id);
        let Some(text) = self.records.read(&name).map_err(io_error)? else {
            auralis_debug!("No stored session for tab {}", tab_id);
            return Ok(TabSession::default());
        };

        let record: PersistedTab =
            ron::from_str(&text).map_err(|err| StoreError::Format(err.to_string()))?;
        if record.version != RECORD_VERSION || record.tab_id != tab_id {
            return Err(StoreError::Format(format!(
                "record {name} holds version {} for tab {}",
                record.version, record.tab_id
            )));
        }
        Ok(record.session)
    }

    fn save(&self, tab_id: TabId, session: &TabSession) -> Result<(), StoreError> {
        let record = PersistedTab {
            version: RECORD_VERSION,
            tab_id,
            session: session.clone(),
        };
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&record, pretty)
            .map_err(|err| StoreError::Format(err.to_string()))?;
        self.records
            .write(&Self::record_name(tab_id), &content)
            .map_err(io_error)?;
        Ok(())
    }

    fn remove(&self, tab_id: TabId) -> Result<(), StoreError> {
        self.records
            .remove(&Self::record_name(tab_id))
            .map_err(io_error)
    }
}

use crate::{TabId, TabSession};

/// Side effects requested by `update`. The host executes them in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadSession {
        tab_id: TabId,
    },
    /// Whole-record overwrite of the tab's stored session.
    PersistSession {
        tab_id: TabId,
        session: TabSession,
    },
    RequestContent {
        tab_id: TabId,
        url: String,
    },
    IngestPage {
        url: String,
        content: String,
    },
    AskQuestion {
        query: String,
        current_url: String,
        processed_urls: Vec<String>,
    },
    StartWatch {
        tab_id: TabId,
    },
    StopWatch,
}

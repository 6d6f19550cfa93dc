use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::TabId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTab {
    pub tab_id: TabId,
    pub url: String,
}

/// Read access to the browser's tabs.
pub trait TabHost: Send + Sync {
    fn active_tab(&self) -> Option<ActiveTab>;
    fn tab_url(&self, tab_id: TabId) -> Option<String>;
}

#[derive(Debug, Default)]
struct BrowserTabs {
    urls: BTreeMap<TabId, String>,
    active: Option<TabId>,
    next_id: TabId,
}

/// In-process stand-in for a browser window. The terminal front end drives it
/// with navigation commands; the watcher and extractor read it.
#[derive(Debug, Default)]
pub struct SimulatedBrowser {
    tabs: RwLock<BrowserTabs>,
}

impl SimulatedBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a tab and makes it active. `tab_id` picks the id, otherwise the
    /// next free one is used.
    pub fn open_tab(&self, tab_id: Option<TabId>, url: impl Into<String>) -> TabId {
        let Ok(mut tabs) = self.tabs.write() else {
            return tab_id.unwrap_or_default();
        };
        let id = tab_id.unwrap_or_else(|| tabs.next_id.max(1));
        tabs.next_id = tabs.next_id.max(id + 1);
        tabs.urls.insert(id, url.into());
        tabs.active = Some(id);
        id
    }

    /// Points an existing tab at a new URL. Returns false for unknown tabs.
    pub fn navigate(&self, tab_id: TabId, url: impl Into<String>) -> bool {
        let Ok(mut tabs) = self.tabs.write() else {
            return false;
        };
        match tabs.urls.get_mut(&tab_id) {
            Some(current) => {
                *current = url.into();
                true
            }
            None => false,
        }
    }

    pub fn close_tab(&self, tab_id: TabId) -> bool {
        let Ok(mut tabs) = self.tabs.write() else {
            return false;
        };
        let removed = tabs.urls.remove(&tab_id).is_some();
        if tabs.active == Some(tab_id) {
            tabs.active = tabs.urls.keys().next_back().copied();
        }
        removed
    }
}

impl TabHost for SimulatedBrowser {
    fn active_tab(&self) -> Option<ActiveTab> {
        let tabs = self.tabs.read().ok()?;
        let tab_id = tabs.active?;
        let url = tabs.urls.get(&tab_id)?.clone();
        Some(ActiveTab { tab_id, url })
    }

    fn tab_url(&self, tab_id: TabId) -> Option<String> {
        self.tabs.read().ok()?.urls.get(&tab_id).cloned()
    }
}

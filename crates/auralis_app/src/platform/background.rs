//! Browser-lifetime bookkeeping that outlives any one popup.

use auralis_core::{TabId, TabStore};
use auralis_logging::{auralis_info, auralis_warn};

/// Forgets everything stored for a closed tab so a reused id starts clean.
pub fn on_tab_removed(store: &dyn TabStore, tab_id: TabId) {
    match store.remove(tab_id) {
        Ok(()) => auralis_info!("Cleared stored session for closed tab {}", tab_id),
        Err(err) => auralis_warn!("Could not clear session for tab {}: {}", tab_id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auralis_core::{MemoryTabStore, Message, TabSession};
    use pretty_assertions::assert_eq;

    #[test]
    fn removal_clears_only_that_tab() {
        let store = MemoryTabStore::new();
        let mut session = TabSession::new();
        session.push(Message::user("hi"));
        store.save(1, &session).unwrap();
        store.save(2, &session).unwrap();

        on_tab_removed(&store, 1);
        on_tab_removed(&store, 1);

        assert_eq!(store.load(1).unwrap(), TabSession::default());
        assert_eq!(store.load(2).unwrap(), session);
    }
}

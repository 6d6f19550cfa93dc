use std::collections::{BTreeMap, VecDeque};

use crate::view_model::{ChatViewModel, MessageView};
use crate::{ChatConfig, Effect, Message, TabId, TabSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Uninitialized,
    Loading,
    Processing,
    Ready,
    /// Ingestion ended without success; questions are refused until a retry.
    Stalled,
    Closed,
}

/// Which path started an ingestion. Decides the wording of the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IngestOrigin {
    Open,
    Navigation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatState {
    config: ChatConfig,
    phase: Phase,
    tab_id: Option<TabId>,
    /// URL seen at popup open, held until the stored session arrives.
    opened_url: Option<String>,
    session: TabSession,
    ingesting: BTreeMap<String, IngestOrigin>,
    ask_in_flight: bool,
    queued_queries: VecDeque<String>,
    dirty: bool,
}

impl ChatState {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tab_id(&self) -> Option<TabId> {
        self.tab_id
    }

    pub fn session(&self) -> &TabSession {
        &self.session
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.phase == Phase::Closed
    }

    pub fn view(&self) -> ChatViewModel {
        ChatViewModel {
            phase: self.phase,
            tab_id: self.tab_id,
            current_url: self.session.current_url.clone(),
            page_processed: self.session.page_processed,
            processed_url_count: self.session.processed_urls.len(),
            messages: self
                .session
                .chat_history
                .iter()
                .enumerate()
                .map(|(index, msg)| MessageView {
                    index,
                    sender: msg.sender,
                    text: msg.text.clone(),
                    display_class: msg.display_class,
                    is_suggestion: msg.is_suggestion,
                })
                .collect(),
            ask_in_flight: self.ask_in_flight,
            queued_queries: self.queued_queries.len(),
            dark_mode: self.config.features.dark_mode,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            self.phase = phase;
            self.dirty = true;
        }
    }

    pub(crate) fn bind(&mut self, tab_id: TabId, url: String) {
        self.tab_id = Some(tab_id);
        self.opened_url = Some(url);
        self.set_phase(Phase::Loading);
    }

    pub(crate) fn take_opened_url(&mut self) -> Option<String> {
        self.opened_url.take()
    }

    pub(crate) fn note_opened_url(&mut self, url: String) {
        self.opened_url = Some(url);
    }

    pub(crate) fn install_session(&mut self, session: TabSession) {
        self.session = session;
        self.dirty = true;
    }

    pub(crate) fn session_mut(&mut self) -> &mut TabSession {
        self.dirty = true;
        &mut self.session
    }

    /// Appends to history and persists the whole record right away.
    pub(crate) fn append(&mut self, message: Message, effects: &mut Vec<Effect>) {
        self.session.push(message);
        self.dirty = true;
        self.persist(effects);
    }

    pub(crate) fn persist(&self, effects: &mut Vec<Effect>) {
        if let Some(tab_id) = self.tab_id {
            effects.push(Effect::PersistSession {
                tab_id,
                session: self.session.clone(),
            });
        }
    }

    pub(crate) fn is_ingesting(&self, url: &str) -> bool {
        self.ingesting.contains_key(url)
    }

    pub(crate) fn ingest_origin(&self, url: &str) -> Option<IngestOrigin> {
        self.ingesting.get(url).copied()
    }

    pub(crate) fn begin_ingest(&mut self, url: String, origin: IngestOrigin) {
        self.ingesting.insert(url, origin);
        self.set_phase(Phase::Processing);
    }

    pub(crate) fn end_ingest(&mut self, url: &str) -> Option<IngestOrigin> {
        self.ingesting.remove(url)
    }

    /// Picks the phase once an ingestion has finished. Other ingestions still
    /// running keep the view in `Processing`.
    pub(crate) fn settle(&mut self, origin: IngestOrigin, succeeded: bool) {
        let next = if !self.ingesting.is_empty() {
            Phase::Processing
        } else if succeeded {
            Phase::Ready
        } else {
            match origin {
                IngestOrigin::Navigation if self.session.page_processed => Phase::Ready,
                _ => Phase::Stalled,
            }
        };
        self.set_phase(next);
    }

    pub(crate) fn ask_in_flight(&self) -> bool {
        self.ask_in_flight
    }

    pub(crate) fn set_ask_in_flight(&mut self, in_flight: bool) {
        self.ask_in_flight = in_flight;
        self.dirty = true;
    }

    pub(crate) fn queue_query(&mut self, query: String) {
        self.queued_queries.push_back(query);
        self.dirty = true;
    }

    pub(crate) fn has_queued_queries(&self) -> bool {
        !self.queued_queries.is_empty()
    }

    pub(crate) fn next_queued_query(&mut self) -> Option<String> {
        let next = self.queued_queries.pop_front();
        if next.is_some() {
            self.dirty = true;
        }
        next
    }

    pub(crate) fn close(&mut self) {
        self.ingesting.clear();
        self.queued_queries.clear();
        self.ask_in_flight = false;
        self.set_phase(Phase::Closed);
    }
}

use crate::{DisplayClass, Phase, Sender, TabId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatViewModel {
    pub phase: Phase,
    pub tab_id: Option<TabId>,
    pub current_url: String,
    pub page_processed: bool,
    pub processed_url_count: usize,
    pub messages: Vec<MessageView>,
    pub ask_in_flight: bool,
    pub queued_queries: usize,
    pub dark_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    /// Position in the history; what a suggestion click sends back.
    pub index: usize,
    pub sender: Sender,
    pub text: String,
    pub display_class: DisplayClass,
    pub is_suggestion: bool,
}

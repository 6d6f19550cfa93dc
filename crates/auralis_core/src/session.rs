use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Opaque browser tab identifier.
pub type TabId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    System,
    User,
    Assistant,
}

/// Styling tag carried along with a message. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayClass {
    #[default]
    Ai,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub display_class: DisplayClass,
    /// Clicking a suggestion resubmits its text as a query.
    #[serde(default)]
    pub is_suggestion: bool,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::System,
            text: text.into(),
            display_class: DisplayClass::Ai,
            is_suggestion: false,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            display_class: DisplayClass::User,
            is_suggestion: false,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
            display_class: DisplayClass::Ai,
            is_suggestion: false,
        }
    }

    pub fn suggestion(text: impl Into<String>) -> Self {
        Self {
            is_suggestion: true,
            ..Self::assistant(text)
        }
    }
}

/// Per-tab conversational state, persisted as a whole record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TabSession {
    pub chat_history: Vec<Message>,
    pub page_processed: bool,
    pub processed_urls: BTreeSet<String>,
    pub current_url: String,
}

impl TabSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processed(&self, url: &str) -> bool {
        self.processed_urls.contains(url)
    }

    /// True when the page in view was ingested before, so the session can go
    /// straight to answering questions.
    pub fn current_page_ready(&self) -> bool {
        self.page_processed && self.is_processed(&self.current_url)
    }

    /// Records a successful ingestion. Returns false when the URL was already known.
    pub fn mark_processed(&mut self, url: &str) -> bool {
        self.page_processed = true;
        self.processed_urls.insert(url.to_string())
    }

    pub fn push(&mut self, message: Message) {
        self.chat_history.push(message);
    }

    pub fn processed_urls_vec(&self) -> Vec<String> {
        self.processed_urls.iter().cloned().collect()
    }
}

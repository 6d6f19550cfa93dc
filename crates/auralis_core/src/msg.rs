use crate::{AnswerResult, ChatError, IngestResult, TabId, TabSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Popup opened on the active tab.
    PopupOpened { tab_id: TabId, url: String },
    /// Store returned the persisted session for the bound tab.
    SessionLoaded { tab_id: TabId, session: TabSession },
    /// Extractor answered a content request. `None` means nothing usable.
    ContentReceived { url: String, content: Option<String> },
    /// Backend finished ingesting `url`.
    IngestCompleted {
        url: String,
        result: Result<IngestResult, ChatError>,
    },
    /// User submitted text from the input box.
    QuerySubmitted(String),
    /// User clicked the message at `index` in the history.
    SuggestionClicked { index: usize },
    /// Backend answered the in-flight question.
    AnswerReceived(Result<AnswerResult, ChatError>),
    /// Watcher read the active tab's URL.
    UrlObserved { url: String },
    /// User asked to retry ingestion of the current page.
    ReprocessRequested,
    /// Popup view is going away.
    PopupClosed,
    /// Fallback for placeholder wiring.
    NoOp,
}

use std::fmt;

pub type TabId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Content role answered for `url`. `None` when nothing usable came back.
    ContentExtracted {
        tab_id: TabId,
        url: String,
        content: Option<String>,
    },
    PageIngested {
        url: String,
        result: Result<IngestOutput, BackendError>,
    },
    QuestionAnswered {
        result: Result<AnswerOutput, BackendError>,
    },
    /// Watcher saw the tab's URL change.
    UrlChanged { tab_id: TabId, url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutput {
    /// Raw status string as reported by the backend.
    pub status: String,
    pub initial_questions: Vec<String>,
}

impl IngestOutput {
    pub fn succeeded(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnswerOutput {
    pub answer: String,
    pub sources: Vec<String>,
    pub suggested_questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for BackendError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Parse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Parse => write!(f, "malformed response"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestResult {
    pub status: IngestStatus,
    pub initial_questions: Vec<String>,
}

impl IngestResult {
    pub fn success(initial_questions: Vec<String>) -> Self {
        Self {
            status: IngestStatus::Success,
            initial_questions,
        }
    }

    pub fn failure() -> Self {
        Self {
            status: IngestStatus::Failure,
            initial_questions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnswerResult {
    pub answer_text: String,
    pub sources: Vec<String>,
    pub suggested_questions: Vec<String>,
}

/// Failures that reach the conversation. Each one ends up as a single
/// user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("network error: {0}")]
    Network(String),
    #[error("backend reported failure: {0}")]
    BackendFailure(String),
    #[error("malformed response: {0}")]
    Parse(String),
}

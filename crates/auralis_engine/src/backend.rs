use std::time::Duration;

use auralis_logging::{auralis_debug, auralis_warn};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{AnswerOutput, BackendError, FailureKind, IngestOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApiVersion {
    /// `/process_page` and `/ask_question`.
    Legacy,
    /// `/v2/process_page` and `/v2/ask_question`.
    #[default]
    V2,
}

impl ApiVersion {
    fn ingest_path(self) -> &'static str {
        match self {
            ApiVersion::Legacy => "process_page",
            ApiVersion::V2 => "v2/process_page",
        }
    }

    fn ask_path(self) -> &'static str {
        match self {
            ApiVersion::Legacy => "ask_question",
            ApiVersion::V2 => "v2/ask_question",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub api_version: ApiVersion,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            api_version: ApiVersion::V2,
            connect_timeout: Duration::from_secs(10),
            // Question generation on the backend runs an LLM; give it room.
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// Remote service that ingests pages and answers questions about them.
/// Calls are made once; nothing here retries.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn ingest_page(&self, content: &str, url: &str) -> Result<IngestOutput, BackendError>;

    async fn ask_question(
        &self,
        query: &str,
        current_url: &str,
        processed_urls: &[String],
    ) -> Result<AnswerOutput, BackendError>;
}

#[derive(Serialize)]
struct IngestRequest<'a> {
    content: &'a str,
    url: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AskRequest<'a> {
    query: &'a str,
    current_url: &'a str,
    processed_urls: &'a [String],
}

#[derive(Deserialize)]
struct IngestReply {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    initial_questions: Option<QuestionList>,
}

#[derive(Deserialize)]
struct AnswerReply {
    answer: String,
    #[serde(default)]
    sources: Option<Vec<String>>,
    #[serde(default)]
    suggested_questions: Option<QuestionList>,
}

#[derive(Deserialize)]
struct ErrorReply {
    error: String,
}

/// The backend hands questions back either as a list or as one
/// newline-delimited block of text.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
enum QuestionList {
    Many(Vec<String>),
    Text(String),
}

impl QuestionList {
    fn into_questions(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            QuestionList::Many(items) => items,
            QuestionList::Text(text) => text.lines().map(ToOwned::to_owned).collect(),
        };
        raw.into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect()
    }
}

fn questions(list: Option<QuestionList>) -> Vec<String> {
    list.map(QuestionList::into_questions).unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        let mut base = self.settings.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)
            .and_then(|url| url.join(path))
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn post<T: Serialize>(&self, path: &str, payload: &T) -> Result<Vec<u8>, BackendError> {
        let url = self.endpoint(path)?;
        let body = serde_json::to_vec(payload)
            .map_err(|err| BackendError::new(FailureKind::Parse, err.to_string()))?;
        auralis_debug!("POST {} ({} bytes)", url, body.len());

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorReply>(&bytes)
                .map(|reply| reply.error)
                .unwrap_or_else(|_| status.to_string());
            auralis_warn!("{} answered {}: {}", path, status, message);
            return Err(BackendError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn ingest_page(&self, content: &str, url: &str) -> Result<IngestOutput, BackendError> {
        let path = self.settings.api_version.ingest_path();
        let bytes = self.post(path, &IngestRequest { content, url }).await?;
        let reply: IngestReply = serde_json::from_slice(&bytes)
            .map_err(|err| BackendError::new(FailureKind::Parse, err.to_string()))?;

        Ok(IngestOutput {
            status: reply.status.unwrap_or_default(),
            initial_questions: questions(reply.initial_questions),
        })
    }

    async fn ask_question(
        &self,
        query: &str,
        current_url: &str,
        processed_urls: &[String],
    ) -> Result<AnswerOutput, BackendError> {
        let path = self.settings.api_version.ask_path();
        let request = AskRequest {
            query,
            current_url,
            processed_urls,
        };
        let bytes = self.post(path, &request).await?;
        let reply: AnswerReply = serde_json::from_slice(&bytes)
            .map_err(|err| BackendError::new(FailureKind::Parse, err.to_string()))?;

        Ok(AnswerOutput {
            answer: reply.answer,
            sources: reply.sources.unwrap_or_default(),
            suggested_questions: questions(reply.suggested_questions),
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}

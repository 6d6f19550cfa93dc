use std::sync::Arc;
use std::time::Duration;

use auralis_logging::{auralis_debug, auralis_warn};

use crate::content::{respond_to_request, ContentRequest};
use crate::{TabHost, TabId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// URL the text was read from.
    pub url: String,
    pub text: String,
}

/// Asks a tab's content role for its text. Every failure collapses to `None`.
#[async_trait::async_trait]
pub trait PageExtractor: Send + Sync {
    async fn request_content(&self, tab_id: TabId) -> Option<PageContent>;
}

#[derive(Debug, Clone)]
pub struct ExtractSettings {
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Loads the tab's URL over HTTP and runs the content role on the document.
pub struct HttpPageExtractor {
    host: Arc<dyn TabHost>,
    settings: ExtractSettings,
    client: reqwest::Client,
}

impl HttpPageExtractor {
    pub fn new(host: Arc<dyn TabHost>, settings: ExtractSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self {
            host,
            settings,
            client,
        })
    }

    async fn load_document(&self, url: &str) -> Result<String, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| err.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("http status {}", status.as_u16()));
        }
        if let Some(len) = response.content_length() {
            if len > self.settings.max_bytes {
                return Err(format!("document too large ({len} bytes)"));
            }
        }
        response.text().await.map_err(|err| err.to_string())
    }
}

#[async_trait::async_trait]
impl PageExtractor for HttpPageExtractor {
    async fn request_content(&self, tab_id: TabId) -> Option<PageContent> {
        let Some(url) = self.host.tab_url(tab_id) else {
            auralis_warn!("content requested for unknown tab {}", tab_id);
            return None;
        };
        let html = match self.load_document(&url).await {
            Ok(html) => html,
            Err(reason) => {
                auralis_warn!("could not load {}: {}", url, reason);
                return None;
            }
        };
        let response = respond_to_request(&ContentRequest::get_page_content(), &html)?;
        auralis_debug!("extracted {} chars from {}", response.content.len(), url);
        Some(PageContent {
            url,
            text: response.content,
        })
    }
}

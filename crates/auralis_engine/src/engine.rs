use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use auralis_logging::{auralis_debug, auralis_error, auralis_warn};

use crate::{Backend, EngineEvent, PageExtractor, TabHost, TabId, UrlWatcher};

/// Receives engine events. Implementations must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Extract {
        tab_id: TabId,
        url: String,
    },
    Ingest {
        url: String,
        content: String,
    },
    Ask {
        query: String,
        current_url: String,
        processed_urls: Vec<String>,
    },
    Watch {
        tab_id: TabId,
        poll_interval: Duration,
    },
    Unwatch,
}

/// Front door to the IO side. Commands run on a tokio runtime owned by a
/// dedicated thread; results come back through the sink in completion order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        backend: Arc<dyn Backend>,
        extractor: Arc<dyn PageExtractor>,
        host: Arc<dyn TabHost>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            let mut watcher: Option<UrlWatcher> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Watch {
                        tab_id,
                        poll_interval,
                    } => {
                        // Replacing the previous watcher drops and cancels it.
                        watcher = Some(UrlWatcher::spawn(
                            runtime.handle(),
                            host.clone(),
                            tab_id,
                            poll_interval,
                            sink.clone(),
                        ));
                    }
                    EngineCommand::Unwatch => {
                        watcher = None;
                    }
                    other => {
                        let backend = backend.clone();
                        let extractor = extractor.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            handle_command(backend.as_ref(), extractor.as_ref(), other, sink.as_ref())
                                .await;
                        });
                    }
                }
            }
            drop(watcher);
            auralis_debug!("engine command loop finished");
        });

        Ok(Self { cmd_tx })
    }

    pub fn request_content(&self, tab_id: TabId, url: impl Into<String>) {
        self.send(EngineCommand::Extract {
            tab_id,
            url: url.into(),
        });
    }

    pub fn ingest(&self, url: impl Into<String>, content: impl Into<String>) {
        self.send(EngineCommand::Ingest {
            url: url.into(),
            content: content.into(),
        });
    }

    pub fn ask(&self, query: String, current_url: String, processed_urls: Vec<String>) {
        self.send(EngineCommand::Ask {
            query,
            current_url,
            processed_urls,
        });
    }

    pub fn watch(&self, tab_id: TabId, poll_interval: Duration) {
        self.send(EngineCommand::Watch {
            tab_id,
            poll_interval,
        });
    }

    pub fn unwatch(&self) {
        self.send(EngineCommand::Unwatch);
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            auralis_error!("engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(
    backend: &dyn Backend,
    extractor: &dyn PageExtractor,
    command: EngineCommand,
    sink: &dyn EventSink,
) {
    match command {
        EngineCommand::Extract { tab_id, url } => {
            let content = match extractor.request_content(tab_id).await {
                Some(page) if page.url == url => Some(page.text),
                Some(page) => {
                    auralis_warn!(
                        "tab {} moved to {} before {} could be read",
                        tab_id,
                        page.url,
                        url
                    );
                    None
                }
                None => None,
            };
            sink.emit(EngineEvent::ContentExtracted {
                tab_id,
                url,
                content,
            });
        }
        EngineCommand::Ingest { url, content } => {
            let result = backend.ingest_page(&content, &url).await;
            sink.emit(EngineEvent::PageIngested { url, result });
        }
        EngineCommand::Ask {
            query,
            current_url,
            processed_urls,
        } => {
            let result = backend
                .ask_question(&query, &current_url, &processed_urls)
                .await;
            sink.emit(EngineEvent::QuestionAnswered { result });
        }
        EngineCommand::Watch { .. } | EngineCommand::Unwatch => {}
    }
}

use std::sync::{mpsc, Arc};
use std::time::Duration;

use auralis_core::{
    AnswerResult, ChatError, Effect, IngestResult, Msg, TabSession, TabStore,
};
use auralis_engine::{
    AnswerOutput, BackendError, EngineEvent, EngineHandle, EventSink, FailureKind, IngestOutput,
};
use auralis_logging::{auralis_debug, auralis_error, auralis_info, auralis_warn};

use super::app::LoopEvent;

/// Executes effects in the order `update` produced them. Store writes happen
/// inline, so a later persist can never land before an earlier one.
pub struct EffectRunner {
    engine: EngineHandle,
    store: Arc<dyn TabStore>,
    loop_tx: mpsc::Sender<LoopEvent>,
    poll_interval: Duration,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        store: Arc<dyn TabStore>,
        loop_tx: mpsc::Sender<LoopEvent>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            engine,
            store,
            loop_tx,
            poll_interval,
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadSession { tab_id } => {
                    let session = match self.store.load(tab_id) {
                        Ok(session) => session,
                        Err(err) => {
                            auralis_warn!("Stored session unreadable, starting fresh: {}", err);
                            TabSession::default()
                        }
                    };
                    let _ = self
                        .loop_tx
                        .send(LoopEvent::Dispatch(Msg::SessionLoaded { tab_id, session }));
                }
                Effect::PersistSession { tab_id, session } => {
                    if let Err(err) = self.store.save(tab_id, &session) {
                        auralis_error!("Failed to persist session: {}", err);
                    }
                }
                Effect::RequestContent { tab_id, url } => {
                    auralis_debug!("RequestContent url={}", url);
                    self.engine.request_content(tab_id, url);
                }
                Effect::IngestPage { url, content } => {
                    auralis_info!("IngestPage url={} content_len={}", url, content.len());
                    self.engine.ingest(url, content);
                }
                Effect::AskQuestion {
                    query,
                    current_url,
                    processed_urls,
                } => {
                    auralis_info!(
                        "AskQuestion query_len={} processed_urls={}",
                        query.len(),
                        processed_urls.len()
                    );
                    self.engine.ask(query, current_url, processed_urls);
                }
                Effect::StartWatch { tab_id } => {
                    self.engine.watch(tab_id, self.poll_interval);
                }
                Effect::StopWatch => self.engine.unwatch(),
            }
        }
    }
}

/// Turns engine events into popup messages on the dispatch loop.
pub struct LoopEventSink {
    tx: mpsc::Sender<LoopEvent>,
}

impl LoopEventSink {
    pub fn new(tx: mpsc::Sender<LoopEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for LoopEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(LoopEvent::Dispatch(map_event(event)));
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ContentExtracted { url, content, .. } => {
            if content.is_none() {
                auralis_warn!("No content extracted for {}", url);
            }
            Msg::ContentReceived { url, content }
        }
        EngineEvent::PageIngested { url, result } => {
            let result = match result {
                Ok(output) => Ok(map_ingest(&url, output)),
                Err(err) => {
                    auralis_warn!("Ingest of {} failed: {}", url, err);
                    Err(map_error(err))
                }
            };
            Msg::IngestCompleted { url, result }
        }
        EngineEvent::QuestionAnswered { result } => Msg::AnswerReceived(match result {
            Ok(output) => Ok(map_answer(output)),
            Err(err) => {
                auralis_warn!("Question failed: {}", err);
                Err(map_error(err))
            }
        }),
        EngineEvent::UrlChanged { url, .. } => Msg::UrlObserved { url },
    }
}

fn map_ingest(url: &str, output: IngestOutput) -> IngestResult {
    if output.succeeded() {
        IngestResult::success(output.initial_questions)
    } else {
        auralis_warn!("Backend reported status {:?} for {}", output.status, url);
        IngestResult::failure()
    }
}

fn map_answer(output: AnswerOutput) -> AnswerResult {
    AnswerResult {
        answer_text: output.answer,
        sources: output.sources,
        suggested_questions: output.suggested_questions,
    }
}

fn map_error(err: BackendError) -> ChatError {
    match err.kind {
        FailureKind::Parse => ChatError::Parse(err.message),
        FailureKind::HttpStatus(_) => ChatError::BackendFailure(err.message),
        FailureKind::Network if !err.message.is_empty() => ChatError::Network(err.message),
        // Timeouts and bad URLs keep their kind label.
        FailureKind::InvalidUrl | FailureKind::Timeout | FailureKind::Network => {
            ChatError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auralis_core::IngestStatus;
    use pretty_assertions::assert_eq;

    fn backend_error(kind: FailureKind, message: &str) -> BackendError {
        BackendError {
            kind,
            message: message.to_string(),
        }
    }

    #[test]
    fn non_success_status_becomes_failed_ingest() {
        let msg = map_event(EngineEvent::PageIngested {
            url: "https://a/".to_string(),
            result: Ok(IngestOutput {
                status: "error".to_string(),
                initial_questions: vec!["ignored?".to_string()],
            }),
        });

        match msg {
            Msg::IngestCompleted { result: Ok(result), .. } => {
                assert_eq!(result.status, IngestStatus::Failure);
                assert!(result.initial_questions.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn answer_fields_carry_over() {
        let msg = map_event(EngineEvent::QuestionAnswered {
            result: Ok(AnswerOutput {
                answer: "42".to_string(),
                sources: vec!["docA".to_string()],
                suggested_questions: vec!["Why?".to_string()],
            }),
        });

        assert_eq!(
            msg,
            Msg::AnswerReceived(Ok(AnswerResult {
                answer_text: "42".to_string(),
                sources: vec!["docA".to_string()],
                suggested_questions: vec!["Why?".to_string()],
            }))
        );
    }

    #[test]
    fn failure_kinds_map_to_chat_errors() {
        assert_eq!(
            map_error(backend_error(FailureKind::Parse, "bad json")),
            ChatError::Parse("bad json".to_string())
        );
        assert_eq!(
            map_error(backend_error(FailureKind::HttpStatus(400), "no page")),
            ChatError::BackendFailure("no page".to_string())
        );
        assert_eq!(
            map_error(backend_error(FailureKind::Timeout, "slow")),
            ChatError::Network("timeout: slow".to_string())
        );
    }

    #[test]
    fn network_failure_reads_without_a_doubled_prefix() {
        let err = map_error(backend_error(FailureKind::Network, "connection refused"));
        assert_eq!(err, ChatError::Network("connection refused".to_string()));
        assert_eq!(err.to_string(), "network error: connection refused");

        let bare = map_error(backend_error(FailureKind::Network, ""));
        assert_eq!(bare.to_string(), "network error: network error");
    }

    #[test]
    fn url_change_becomes_observation() {
        assert_eq!(
            map_event(EngineEvent::UrlChanged {
                tab_id: 3,
                url: "https://b/".to_string()
            }),
            Msg::UrlObserved {
                url: "https://b/".to_string()
            }
        );
    }
}

use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use auralis_core::{update, ChatConfig, ChatState, Msg, TabId, TabStore};
use auralis_engine::{
    EngineHandle, ExtractSettings, HttpPageExtractor, ReqwestBackend, SimulatedBrowser, TabHost,
};
use auralis_logging::{auralis_info, auralis_warn};
use log::LevelFilter;

use super::background;
use super::config::{AppConfig, Args};
use super::effects::{EffectRunner, LoopEventSink};
use super::logging;
use super::persistence::FileTabStore;
use super::ui::input::{parse_command, Command, HELP};
use super::ui::printer::Printer;
use super::ui::render::{TerminalCommand, Transcript};

/// Everything the dispatch loop reacts to.
pub enum LoopEvent {
    Dispatch(Msg),
    /// Tab closed by the user: close the popup, then forget the tab.
    CloseTab,
    /// Popup dismissed; the stored conversation stays.
    Quit,
    /// Help or usage hint to print as-is.
    Notice(String),
}

pub fn run_app(args: Args) -> anyhow::Result<()> {
    let config = AppConfig::load(args.config.as_deref())?.apply_args(&args);
    logging::initialize(config.log_destination, &config.log_file, LevelFilter::Info);
    auralis_info!(
        "Starting; backend {} ({:?}), store {:?}",
        config.backend_url,
        config.api_version,
        config.store_dir
    );

    let browser = Arc::new(SimulatedBrowser::new());
    browser.open_tab(args.tab_id, args.url.clone());
    let active = browser
        .active_tab()
        .context("simulated browser has no active tab")?;
    auralis_logging::bind_tab(active.tab_id);

    let store: Arc<dyn TabStore> = Arc::new(FileTabStore::new(config.store_dir.clone()));
    let (loop_tx, loop_rx) = mpsc::channel::<LoopEvent>();

    let backend = Arc::new(
        ReqwestBackend::new(config.backend_settings()).context("failed to build backend client")?,
    );
    let extractor = Arc::new(
        HttpPageExtractor::new(browser.clone(), ExtractSettings::default())
            .context("failed to build page extractor")?,
    );
    let engine = EngineHandle::new(
        backend,
        extractor,
        browser.clone(),
        Arc::new(LoopEventSink::new(loop_tx.clone())),
    )?;

    let printer = Printer::spawn(config.pacing(), Box::new(io::stdout()));
    let runner = EffectRunner::new(engine, store.clone(), loop_tx.clone(), config.poll_interval());
    spawn_input(loop_tx, browser.clone(), active.tab_id);

    let mut popup = Popup::new(config.chat_config(), runner, printer.sender());
    popup.dispatch(Msg::PopupOpened {
        tab_id: active.tab_id,
        url: active.url,
    });

    while let Ok(event) = loop_rx.recv() {
        match event {
            LoopEvent::Dispatch(msg) => popup.dispatch(msg),
            LoopEvent::Notice(text) => popup.notice(text),
            LoopEvent::CloseTab => {
                // Closing first stops further persists for this tab.
                popup.dispatch(Msg::PopupClosed);
                browser.close_tab(active.tab_id);
                background::on_tab_removed(store.as_ref(), active.tab_id);
                break;
            }
            LoopEvent::Quit => {
                popup.dispatch(Msg::PopupClosed);
                break;
            }
        }
    }

    // The popup holds the last printer sender; paced lines still drain.
    drop(popup);
    printer.finish();
    auralis_info!("Popup closed");
    auralis_logging::unbind_tab();
    Ok(())
}

/// Single owner of the conversation state. Every message for the tab goes
/// through `dispatch`, one at a time.
struct Popup {
    state: ChatState,
    runner: EffectRunner,
    transcript: Transcript,
    printer: mpsc::Sender<TerminalCommand>,
}

impl Popup {
    fn new(config: ChatConfig, runner: EffectRunner, printer: mpsc::Sender<TerminalCommand>) -> Self {
        Self {
            state: ChatState::new(config),
            runner,
            transcript: Transcript::new(),
            printer,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.run(effects);

        if state.consume_dirty() {
            for cmd in self.transcript.render(&state.view()) {
                let _ = self.printer.send(cmd);
            }
        }
        self.state = state;
    }

    fn notice(&self, text: String) {
        let _ = self.printer.send(TerminalCommand::Status(text));
    }
}

fn spawn_input(loop_tx: mpsc::Sender<LoopEvent>, browser: Arc<SimulatedBrowser>, tab_id: TabId) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let event = match parse_command(&line) {
                Command::Query(text) => LoopEvent::Dispatch(Msg::QuerySubmitted(text)),
                Command::Pick(index) => LoopEvent::Dispatch(Msg::SuggestionClicked { index }),
                Command::Reprocess => LoopEvent::Dispatch(Msg::ReprocessRequested),
                Command::Close => LoopEvent::CloseTab,
                Command::Quit => LoopEvent::Quit,
                Command::Open(url) => {
                    // The watcher notices the change on its next poll.
                    if !browser.navigate(tab_id, url) {
                        auralis_warn!("Navigation ignored; tab {} is gone", tab_id);
                    }
                    continue;
                }
                Command::Help => LoopEvent::Notice(HELP.to_string()),
                Command::Invalid(hint) => LoopEvent::Notice(hint),
            };
            let finished = matches!(event, LoopEvent::CloseTab | LoopEvent::Quit);
            if loop_tx.send(event).is_err() || finished {
                return;
            }
        }
        let _ = loop_tx.send(LoopEvent::Quit);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use auralis_core::{MemoryTabStore, Phase, PAGE_PROCESSED, PROCESSING_PAGE};
    use auralis_engine::{
        AnswerOutput, Backend, BackendError, IngestOutput, PageContent, PageExtractor,
    };
    use pretty_assertions::assert_eq;

    struct StubBackend;

    #[async_trait::async_trait]
    impl Backend for StubBackend {
        async fn ingest_page(&self, _content: &str, _url: &str) -> Result<IngestOutput, BackendError> {
            Ok(IngestOutput {
                status: "success".to_string(),
                initial_questions: vec!["What is it?".to_string()],
            })
        }

        async fn ask_question(
            &self,
            query: &str,
            _current_url: &str,
            processed_urls: &[String],
        ) -> Result<AnswerOutput, BackendError> {
            Ok(AnswerOutput {
                answer: format!("{query} ({} pages)", processed_urls.len()),
                ..AnswerOutput::default()
            })
        }
    }

    struct StubExtractor {
        host: Arc<SimulatedBrowser>,
    }

    #[async_trait::async_trait]
    impl PageExtractor for StubExtractor {
        async fn request_content(&self, tab_id: TabId) -> Option<PageContent> {
            Some(PageContent {
                url: self.host.tab_url(tab_id)?,
                text: "Page text".to_string(),
            })
        }
    }

    fn drive_until(
        popup: &mut Popup,
        rx: &mpsc::Receiver<LoopEvent>,
        done: impl Fn(&ChatState) -> bool,
    ) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(&popup.state) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining).expect("loop event") {
                LoopEvent::Dispatch(msg) => popup.dispatch(msg),
                LoopEvent::Notice(_) => {}
                LoopEvent::CloseTab | LoopEvent::Quit => panic!("unexpected shutdown"),
            }
        }
    }

    #[test]
    fn opened_page_is_ingested_and_answers_are_stored() {
        let browser = Arc::new(SimulatedBrowser::new());
        let tab = browser.open_tab(Some(11), "https://a.example/");
        let store = Arc::new(MemoryTabStore::new());
        let (loop_tx, loop_rx) = mpsc::channel();
        let engine = EngineHandle::new(
            Arc::new(StubBackend),
            Arc::new(StubExtractor {
                host: browser.clone(),
            }),
            browser.clone(),
            Arc::new(LoopEventSink::new(loop_tx.clone())),
        )
        .unwrap();
        let runner = EffectRunner::new(engine, store.clone(), loop_tx, Duration::from_millis(20));
        let (printer, _printed) = mpsc::channel();
        let mut popup = Popup::new(ChatConfig::default(), runner, printer);

        popup.dispatch(Msg::PopupOpened {
            tab_id: tab,
            url: "https://a.example/".to_string(),
        });
        drive_until(&mut popup, &loop_rx, |state| state.phase() == Phase::Ready);
        popup.dispatch(Msg::QuerySubmitted("Summary?".to_string()));
        drive_until(&mut popup, &loop_rx, |state| !state.view().ask_in_flight);

        let stored = store.load(tab).unwrap();
        let texts: Vec<&str> = stored
            .chat_history
            .iter()
            .map(|message| message.text.as_str())
            .collect();
        assert_eq!(
            texts,
            vec![
                PROCESSING_PAGE,
                PAGE_PROCESSED,
                "What is it?",
                "Summary?",
                "Summary? (1 pages)"
            ]
        );
        assert!(stored.is_processed("https://a.example/"));
    }
}

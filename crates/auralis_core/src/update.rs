use crate::state::IngestOrigin;
use crate::{
    AnswerResult, ChatError, ChatState, Effect, IngestResult, IngestStatus, Message, Msg, Phase,
    TabId, TabSession,
};

pub const NO_CONTENT: &str = "No content found on page";
pub const PROCESSING_PAGE: &str = "Processing page...";
pub const PAGE_PROCESSED: &str = "Page processed successfully. How may I assist you today?";
pub const PAGE_FAILED: &str = "Failed to process page";
pub const NEW_PAGE_PROCESSED: &str = "New page processed. How may I assist you?";
pub const NEW_PAGE_FAILED: &str = "Failed to process new page";
pub const PLEASE_WAIT: &str = "Please wait while the page is being processed.";
pub const ANSWER_FAILED: &str = "Failed to get response from server";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ChatState, msg: Msg) -> (ChatState, Vec<Effect>) {
    if state.is_closed() {
        return (state, Vec::new());
    }

    let mut effects = Vec::new();
    match msg {
        Msg::PopupOpened { tab_id, url } => {
            if state.phase() == Phase::Uninitialized {
                state.bind(tab_id, url);
                effects.push(Effect::LoadSession { tab_id });
            }
        }
        Msg::SessionLoaded { tab_id, session } => {
            on_session_loaded(&mut state, tab_id, session, &mut effects);
        }
        Msg::ContentReceived { url, content } => {
            on_content(&mut state, url, content, &mut effects);
        }
        Msg::IngestCompleted { url, result } => {
            on_ingest_completed(&mut state, url, result, &mut effects);
        }
        Msg::QuerySubmitted(raw) => {
            let query = raw.trim();
            if !query.is_empty() {
                submit_query(&mut state, query.to_string(), &mut effects);
            }
        }
        Msg::SuggestionClicked { index } => {
            let text = state
                .session()
                .chat_history
                .get(index)
                .filter(|msg| msg.is_suggestion)
                .map(|msg| msg.text.clone());
            if let Some(text) = text {
                submit_query(&mut state, text, &mut effects);
            }
        }
        Msg::AnswerReceived(result) => {
            if state.ask_in_flight() {
                state.set_ask_in_flight(false);
                on_answer(&mut state, result, &mut effects);
                dispatch_next_queued(&mut state, &mut effects);
            }
        }
        Msg::UrlObserved { url } => {
            on_url_observed(&mut state, url, &mut effects);
        }
        Msg::ReprocessRequested => {
            if matches!(
                state.phase(),
                Phase::Processing | Phase::Ready | Phase::Stalled
            ) {
                let url = state.session().current_url.clone();
                start_ingest(&mut state, url, IngestOrigin::Open, &mut effects);
            }
        }
        Msg::PopupClosed => {
            state.close();
            effects.push(Effect::StopWatch);
        }
        Msg::NoOp => {}
    }

    (state, effects)
}

fn on_session_loaded(
    state: &mut ChatState,
    tab_id: TabId,
    mut session: TabSession,
    effects: &mut Vec<Effect>,
) {
    if state.phase() != Phase::Loading || state.tab_id() != Some(tab_id) {
        return;
    }
    if let Some(url) = state.take_opened_url() {
        session.current_url = url;
    }
    let ready = session.current_page_ready();
    // Recorded as ingested but without the flag: nothing left to ingest.
    let already_ingested = !ready && session.is_processed(&session.current_url);
    if already_ingested {
        session.page_processed = true;
    }
    let url = session.current_url.clone();
    state.install_session(session);
    state.persist(effects);
    effects.push(Effect::StartWatch { tab_id });

    if ready || already_ingested {
        state.set_phase(Phase::Ready);
    } else {
        start_ingest(state, url, IngestOrigin::Open, effects);
    }
}

/// Asks the extractor for the page behind `url`, unless it is already known
/// or on its way.
fn start_ingest(
    state: &mut ChatState,
    url: String,
    origin: IngestOrigin,
    effects: &mut Vec<Effect>,
) {
    if state.session().is_processed(&url) || state.is_ingesting(&url) {
        return;
    }
    let Some(tab_id) = state.tab_id() else {
        return;
    };
    state.begin_ingest(url.clone(), origin);
    effects.push(Effect::RequestContent { tab_id, url });
}

fn on_content(
    state: &mut ChatState,
    url: String,
    content: Option<String>,
    effects: &mut Vec<Effect>,
) {
    let Some(origin) = state.ingest_origin(&url) else {
        return;
    };
    match content.filter(|text| !text.trim().is_empty()) {
        Some(content) => {
            if origin == IngestOrigin::Open {
                state.append(Message::system(PROCESSING_PAGE), effects);
            }
            effects.push(Effect::IngestPage { url, content });
        }
        None => {
            state.end_ingest(&url);
            if origin == IngestOrigin::Open {
                state.append(Message::system(NO_CONTENT), effects);
            }
            state.settle(origin, false);
            dispatch_next_queued(state, effects);
        }
    }
}

fn on_ingest_completed(
    state: &mut ChatState,
    url: String,
    result: Result<IngestResult, ChatError>,
    effects: &mut Vec<Effect>,
) {
    let Some(origin) = state.end_ingest(&url) else {
        return;
    };
    let succeeded = match result {
        Ok(IngestResult {
            status: IngestStatus::Success,
            initial_questions,
        }) => {
            state.session_mut().mark_processed(&url);
            state.persist(effects);
            match origin {
                IngestOrigin::Open => {
                    state.append(Message::assistant(PAGE_PROCESSED), effects);
                    for question in initial_questions {
                        state.append(Message::suggestion(question), effects);
                    }
                }
                IngestOrigin::Navigation => {
                    state.append(Message::assistant(NEW_PAGE_PROCESSED), effects);
                }
            }
            true
        }
        Ok(IngestResult {
            status: IngestStatus::Failure,
            ..
        }) => {
            let text = match origin {
                IngestOrigin::Open => PAGE_FAILED,
                IngestOrigin::Navigation => NEW_PAGE_FAILED,
            };
            state.append(Message::system(text), effects);
            false
        }
        Err(err) => {
            let text = match origin {
                IngestOrigin::Open => format!("{PAGE_FAILED}: {err}"),
                IngestOrigin::Navigation => NEW_PAGE_FAILED.to_string(),
            };
            state.append(Message::system(text), effects);
            false
        }
    };
    state.settle(origin, succeeded);
    dispatch_next_queued(state, effects);
}

fn submit_query(state: &mut ChatState, query: String, effects: &mut Vec<Effect>) {
    if state.tab_id().is_none() {
        return;
    }
    if state.phase() != Phase::Ready {
        state.append(Message::system(PLEASE_WAIT), effects);
        return;
    }
    if state.ask_in_flight() || state.has_queued_queries() {
        state.queue_query(query);
        return;
    }
    dispatch_query(state, query, effects);
}

/// Sends the oldest queued question once the view is `Ready` and nothing is
/// in flight. Queued questions wait out any processing in between.
fn dispatch_next_queued(state: &mut ChatState, effects: &mut Vec<Effect>) {
    if state.phase() != Phase::Ready || state.ask_in_flight() {
        return;
    }
    if let Some(next) = state.next_queued_query() {
        dispatch_query(state, next, effects);
    }
}

fn dispatch_query(state: &mut ChatState, query: String, effects: &mut Vec<Effect>) {
    state.append(Message::user(query.clone()), effects);
    state.set_ask_in_flight(true);

    let session = state.session();
    let current_url = session.current_url.clone();
    let processed_urls = if state.config().features.multi_url_tracking {
        session.processed_urls_vec()
    } else if session.is_processed(&current_url) {
        vec![current_url.clone()]
    } else {
        Vec::new()
    };
    effects.push(Effect::AskQuestion {
        query,
        current_url,
        processed_urls,
    });
}

fn on_answer(
    state: &mut ChatState,
    result: Result<AnswerResult, ChatError>,
    effects: &mut Vec<Effect>,
) {
    match result {
        Ok(answer) => {
            state.append(Message::assistant(answer.answer_text), effects);
            if state.config().features.show_sources && !answer.sources.is_empty() {
                let sources = format!("Sources: {}", answer.sources.join(", "));
                state.append(Message::assistant(sources), effects);
            }
            for question in answer.suggested_questions {
                state.append(Message::suggestion(question), effects);
            }
        }
        Err(_) => {
            state.append(Message::system(ANSWER_FAILED), effects);
        }
    }
}

fn on_url_observed(state: &mut ChatState, url: String, effects: &mut Vec<Effect>) {
    match state.phase() {
        Phase::Uninitialized | Phase::Closed => return,
        Phase::Loading => {
            state.note_opened_url(url);
            return;
        }
        Phase::Processing | Phase::Ready | Phase::Stalled => {}
    }
    if state.session().current_url == url {
        return;
    }
    state.session_mut().current_url = url.clone();
    state.persist(effects);

    if state.config().features.multi_url_tracking {
        start_ingest(state, url, IngestOrigin::Navigation, effects);
    }
}

use std::sync::Arc;
use std::time::Duration;

use auralis_logging::{auralis_debug, auralis_info};
use tokio::runtime::Handle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink, TabHost, TabId};

/// Polls one tab's URL and reports each change. Dropping the watcher stops
/// the polling task.
pub struct UrlWatcher {
    cancel: CancellationToken,
}

impl UrlWatcher {
    pub fn spawn(
        runtime: &Handle,
        host: Arc<dyn TabHost>,
        tab_id: TabId,
        poll_interval: Duration,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        runtime.spawn(async move {
            poll_loop(host, tab_id, poll_interval, sink, token).await;
        });
        Self { cancel }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for UrlWatcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop(
    host: Arc<dyn TabHost>,
    tab_id: TabId,
    poll_interval: Duration,
    sink: Arc<dyn EventSink>,
    cancel: CancellationToken,
) {
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_seen: Option<String> = None;
    auralis_debug!("watching tab {} every {:?}", tab_id, poll_interval);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let Some(url) = host.tab_url(tab_id) else {
            continue;
        };
        if last_seen.as_deref() != Some(url.as_str()) {
            last_seen = Some(url.clone());
            sink.emit(EngineEvent::UrlChanged { tab_id, url });
        }
    }
    auralis_info!("stopped watching tab {}", tab_id);
}

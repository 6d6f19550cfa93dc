//! Auralis engine: backend client, content extraction, URL watching and
//! record storage. Everything that touches the network or the disk.
mod backend;
pub mod content;
mod engine;
mod extract;
mod host;
mod persist;
mod types;
mod watcher;

pub use backend::{ApiVersion, Backend, BackendSettings, ReqwestBackend};
pub use content::{respond_to_request, visible_text, ContentRequest, ContentResponse};
pub use engine::{ChannelEventSink, EngineError, EngineHandle, EventSink};
pub use extract::{ExtractSettings, HttpPageExtractor, PageContent, PageExtractor};
pub use host::{ActiveTab, SimulatedBrowser, TabHost};
pub use persist::{ensure_record_dir, PersistError, RecordFiles};
pub use types::{AnswerOutput, BackendError, EngineEvent, FailureKind, IngestOutput, TabId};
pub use watcher::UrlWatcher;

//! Auralis core: pure per-tab conversation state machine and view-model helpers.
mod config;
mod effect;
mod msg;
mod outcome;
mod session;
mod state;
mod store;
mod update;
mod view_model;

pub use config::{ChatConfig, FeatureFlags};
pub use effect::Effect;
pub use msg::Msg;
pub use outcome::{AnswerResult, ChatError, IngestResult, IngestStatus};
pub use session::{DisplayClass, Message, Sender, TabId, TabSession};
pub use state::{ChatState, Phase};
pub use store::{MemoryTabStore, StoreError, TabStore};
pub use update::{
    update, ANSWER_FAILED, NEW_PAGE_FAILED, NEW_PAGE_PROCESSED, NO_CONTENT, PAGE_FAILED,
    PAGE_PROCESSED, PLEASE_WAIT, PROCESSING_PAGE,
};
pub use view_model::{ChatViewModel, MessageView};

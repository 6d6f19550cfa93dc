use serde::{Deserialize, Serialize};

/// Switches that used to be separate popup builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Re-ingest on navigation and send every processed URL with a question.
    pub multi_url_tracking: bool,
    pub show_sources: bool,
    pub dark_mode: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            multi_url_tracking: true,
            show_sources: true,
            dark_mode: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatConfig {
    pub features: FeatureFlags,
}

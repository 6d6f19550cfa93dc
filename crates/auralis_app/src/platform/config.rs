use std::path::{Path, PathBuf};
use std::time::Duration;

use auralis_core::{ChatConfig, FeatureFlags, TabId};
use auralis_engine::{ApiVersion, BackendSettings};
use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "auralis.ron";

#[derive(Debug, Parser)]
#[command(name = "auralis", version, about = "Chat with the page open in a tab")]
pub struct Args {
    /// Page to open in the simulated tab.
    pub url: String,

    /// RON configuration file. Defaults to ./auralis.ron when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Reuse a tab id, picking up any conversation stored for it.
    #[arg(long)]
    pub tab_id: Option<TabId>,

    /// Directory holding per-tab conversation records.
    #[arg(long)]
    pub store_dir: Option<PathBuf>,

    /// Base URL of the question-answering backend.
    #[arg(long)]
    pub backend_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub api_version: ApiVersion,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// How often the open tab's URL is checked.
    pub poll_interval_ms: u64,
    /// Delay between transcript lines printed after the first render.
    pub pacing_ms: u64,
    pub store_dir: PathBuf,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
    pub features: FeatureFlags,
}

impl Default for AppConfig {
    fn default() -> Self {
        let backend = BackendSettings::default();
        Self {
            backend_url: backend.base_url,
            api_version: backend.api_version,
            connect_timeout_secs: backend.connect_timeout.as_secs(),
            request_timeout_secs: backend.request_timeout.as_secs(),
            poll_interval_ms: 1000,
            pacing_ms: 2000,
            store_dir: PathBuf::from(".auralis"),
            log_destination: LogDestination::File,
            log_file: PathBuf::from("auralis.log"),
            features: FeatureFlags::default(),
        }
    }
}

impl AppConfig {
    /// An explicit path must exist. Without one, `auralis.ron` is read if
    /// present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    fn parse(text: &str) -> Result<Self, String> {
        ron::from_str(text).map_err(|err| err.to_string())
    }

    /// Command-line values win over the file.
    pub fn apply_args(mut self, args: &Args) -> Self {
        if let Some(dir) = &args.store_dir {
            self.store_dir = dir.clone();
        }
        if let Some(url) = &args.backend_url {
            self.backend_url = url.clone();
        }
        self
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.backend_url.clone(),
            api_version: self.api_version,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig {
            features: self.features,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(10))
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

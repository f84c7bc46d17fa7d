use std::fs;
use std::path::Path;
use std::time::Duration;

use accel_core::{Feed, Layout, Mode};
use accel_engine::HistorySettings;
use accel_logging::{accel_info, accel_warn};
use serde::{Deserialize, Serialize};

use super::cli::CliArgs;

/// Page size of the history endpoint, used to turn the total count into a page count.
pub const HISTORY_PAGE_SIZE: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub ws_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub page_size: u64,
    pub mode: Mode,
}

impl Default for AppConfig {
    fn default() -> Self {
        let history = HistorySettings::default();
        Self {
            api_url: history.base_url,
            ws_url: "wss://mempool.space/api/v1/ws".to_string(),
            connect_timeout_secs: history.connect_timeout.as_secs(),
            request_timeout_secs: history.request_timeout.as_secs(),
            page_size: HISTORY_PAGE_SIZE,
            mode: Mode::default(),
        }
    }
}

impl AppConfig {
    /// Overlays command-line values on top of file or default values.
    pub fn apply_cli(&mut self, args: &CliArgs) {
        if let Some(api_url) = &args.api_url {
            self.api_url = api_url.clone();
        }
        if let Some(ws_url) = &args.ws_url {
            self.ws_url = ws_url.clone();
        }
        if args.pending {
            self.mode.feed = Feed::Pending;
        }
        if args.widget {
            self.mode.layout = Layout::Widget;
        }
    }

    pub fn history_settings(&self) -> HistorySettings {
        HistorySettings {
            base_url: self.api_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Reads the config file, falling back to defaults when it is missing or invalid.
pub(crate) fn load_config(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            accel_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            accel_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            accel_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}

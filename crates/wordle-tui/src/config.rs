use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use wordle_core::Platform;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5001";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub platform: Platform,
    pub log_level: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            platform: Platform::Desktop,
            log_level: "info".to_string(),
            request_timeout_secs: 10,
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordle-tui")
        .join("config.json")
}

impl Settings {
    /// Defaults, then the config file if present, then the environment.
    /// A broken file is reported alongside settings built without it.
    pub fn load() -> (Self, Option<ConfigError>) {
        let path = config_path();
        let (mut settings, problem) = match Self::from_file(&path) {
            Ok(settings) => (settings, None),
            Err(e) => (Self::default(), Some(e)),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        (settings, problem)
    }

    fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_json(&raw).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.clone(),
                source,
            }),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("WORDLE_SOLVER_URL") {
            self.server_url = url;
        }
        match lookup("WORDLE_PLATFORM").as_deref() {
            Some("touch") => self.platform = Platform::Touch,
            Some("desktop") => self.platform = Platform::Desktop,
            _ => {}
        }
        if let Some(level) = lookup("WORDLE_LOG") {
            self.log_level = level;
        }
    }

    pub fn solve_url(&self) -> String {
        format!("{}/api/solve", self.server_url.trim_end_matches('/'))
    }
}

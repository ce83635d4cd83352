//! Process configuration: environment variables, overridden by flags.

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

/// Site root used when nothing else is configured.
pub const DEFAULT_SOURCE: &str = "./site";
const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 10;

/// Resolved CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Site root directory or base URL.
    pub source: String,
    /// Persisted state file.
    pub state_path: PathBuf,
    /// Timeout for site document requests.
    pub http_timeout: Duration,
    /// Language tag of the host, used when no locale is persisted.
    pub system_locale: Option<String>,
}

impl CliConfig {
    /// Read `NAVFLOW_SOURCE`, `NAVFLOW_STATE_PATH`,
    /// `NAVFLOW_HTTP_TIMEOUT_SECONDS` and `LANG`.
    pub fn from_env() -> Self {
        let source = non_empty_env("NAVFLOW_SOURCE").unwrap_or_else(|| DEFAULT_SOURCE.to_string());
        let state_path = non_empty_env("NAVFLOW_STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_state_path);
        let timeout = non_empty_env("NAVFLOW_HTTP_TIMEOUT_SECONDS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECONDS)
            .max(1);

        Self {
            source,
            state_path,
            http_timeout: Duration::from_secs(timeout),
            system_locale: non_empty_env("LANG"),
        }
    }

    /// Apply `--source` / `--state`.
    pub fn with_overrides(mut self, source: Option<String>, state: Option<PathBuf>) -> Self {
        if let Some(source) = source.filter(|value| !value.trim().is_empty()) {
            self.source = source;
        }
        if let Some(state) = state {
            self.state_path = state;
        }
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn default_state_path() -> PathBuf {
    let home = env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Path::new(".").to_path_buf());
    home.join(".navflow").join("state.json")
}

// Per-invocation configuration. Built once in `main` and passed explicitly to
// the request and history components; nothing here is global.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://processmcprequest-x2panoolwa-an.a.run.app";
pub const TOKEN_VAR: &str = "KAMOS_API_TOKEN";

/// Resolved settings for one run of the tool.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub base_dir: PathBuf,
    pub timeout_ms: u64,
    pub silent: bool,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from the environment. The base directory comes from
    /// `KAMOS_HOME`, then the current directory, then the home directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_dir = match env::var("KAMOS_HOME") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => env::current_dir()
                .ok()
                .or_else(dirs::home_dir)
                .ok_or(ConfigError::NoBaseDir)?,
        };
        Ok(Self::for_base_dir(base_dir))
    }

    /// Load configuration rooted at `base_dir`, reading the token from the
    /// environment or from `<base_dir>/.env`.
    pub fn for_base_dir(base_dir: PathBuf) -> Self {
        let api_token = env::var(TOKEN_VAR)
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| read_env_file(&base_dir.join(".env"), TOKEN_VAR));

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Self {
            api_url: env::var("KAMOS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_token,
            base_dir,
            timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300_000),
            silent: false,
            logging,
        }
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Primary persisted document.
    pub fn latest_json_path(&self) -> PathBuf {
        self.base_dir.join(".agent").join("temp").join("kamos_latest.json")
    }

    /// Script-loadable mirror read by the browser viewer.
    pub fn viewer_js_path(&self) -> PathBuf {
        self.base_dir.join(".agent").join("viewer").join("data.js")
    }
}

/// Look up `key` in a `key=value` file. Blank and `#` lines are skipped,
/// whitespace and surrounding quotes trimmed; values are taken literally with
/// no variable expansion. A missing file yields `None`.
pub fn read_env_file(path: &Path, key: &str) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| k.trim() == key)
        .map(|(_, v)| v.trim().trim_matches('\'').trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}

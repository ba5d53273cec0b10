//! Application configuration.
//!
//! Values come from `config.json` in the per-user config directory, then environment
//! overrides. The API token has no built-in value: without `MODRINTH_TOKEN` or an `api_token`
//! entry, searches are sent anonymously.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const ENV_API_TOKEN: &str = "MODRINTH_TOKEN";
pub const ENV_API_URL: &str = "MODRINTH_API_URL";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub user_agent: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.modrinth.com/v2".to_string(),
            api_token: None,
            user_agent: format!("modpack-designer/{}", env!("CARGO_PKG_VERSION")),
            page_size: 20,
            request_timeout_secs: 15,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read config: {err}"),
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl AppConfig {
    /// Reads the config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Applies overrides from `lookup`, which maps variable names to values.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|t| !t.trim().is_empty()) {
            self.api_token = Some(token);
        }
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        if self.page_size == 0 {
            self.page_size = Self::default().page_size;
        }
    }

    /// File config plus process environment. Never fails: problems are logged and the
    /// defaults are used instead.
    pub fn load(path: Option<&Path>) -> Self {
        let mut config = match path {
            Some(path) => Self::from_file(path).unwrap_or_else(|err| {
                log::warn!("{err}; using default configuration");
                Self::default()
            }),
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        log::info!(
            "Using search API {} ({})",
            config.api_base_url,
            if config.api_token.is_some() {
                "authenticated"
            } else {
                "anonymous"
            }
        );
        config
    }
}

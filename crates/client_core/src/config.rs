use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::transport::predict_url;

pub const DEFAULT_CONFIG_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Root address of the prediction service.
    pub api_base_url: String,
    /// Delay between a successful submission and the reveal event.
    pub reveal_delay_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".into(),
            reveal_delay_ms: 100,
        }
    }
}

impl ClientSettings {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn predict_url(&self) -> Result<Url, SettingsError> {
        predict_url(&self.api_base_url)
    }

    /// Replaces the base URL, validating the new value.
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Result<Self, SettingsError> {
        self.api_base_url = api_base_url.into();
        self.predict_url()?;
        Ok(self)
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid API base URL '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    reveal_delay_ms: Option<u64>,
}

/// Resolves settings from `client.toml` in the working directory and the
/// process environment.
pub fn load_settings() -> Result<ClientSettings, SettingsError> {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file at `path` if it exists, then environment
/// variables looked up through `env`.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, SettingsError> {
    let mut settings = ClientSettings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings =
                toml::from_str(&raw).map_err(|source| SettingsError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            if let Some(v) = file_cfg.api_base_url {
                settings.api_base_url = v;
            }
            if let Some(v) = file_cfg.reveal_delay_ms {
                settings.reveal_delay_ms = v;
            }
            debug!(path = %path.display(), "loaded client settings file");
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    if let Some(v) = env("API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("APP__REVEAL_DELAY_MS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.reveal_delay_ms = parsed,
            Err(_) => warn!(value = %v, "ignoring non-numeric APP__REVEAL_DELAY_MS"),
        }
    }

    settings.predict_url()?;
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "GIPOLY_API_URL";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_NOTIFICATION_TIMEOUT_MS: u64 = 3000;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Where the auth token is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    #[default]
    Keyring,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientSettings {
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>, // AI generation calls can take a while
    pub notification_timeout_ms: Option<u64>,
    #[serde(default)]
    pub token_backend: TokenBackend,
}

impl ClientSettings {
    /// Backend base URL: `GIPOLY_API_URL`, then the settings file, then the default.
    pub fn api_url(&self) -> String {
        self.resolve_api_url(std::env::var(API_URL_ENV).ok())
    }

    fn resolve_api_url(&self, from_env: Option<String>) -> String {
        from_env
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(
            self.notification_timeout_ms
                .unwrap_or(DEFAULT_NOTIFICATION_TIMEOUT_MS),
        )
    }
}

/// `<config dir>/gipoly`
pub fn data_dir() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".config"));
    config_dir.join("gipoly")
}

pub fn get_settings_path() -> PathBuf {
    data_dir().join("settings.json")
}

pub fn load_settings() -> Result<ClientSettings, SettingsError> {
    let path = get_settings_path();

    if !path.exists() {
        return Ok(ClientSettings::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    let settings = serde_json::from_str(&contents)?;
    Ok(settings)
}

pub fn save_settings(settings: &ClientSettings) -> Result<(), SettingsError> {
    let path = get_settings_path();

    // Ensure directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = serde_json::to_string_pretty(settings)?;
    std::fs::write(&path, contents)?;

    log::info!("Settings saved to {:?}", path);
    Ok(())
}

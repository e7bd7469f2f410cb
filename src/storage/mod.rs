//! Durable key-value persistence for the three client keys: auth token, UI
//! language and the current-workspace snapshot.

mod file;
mod keychain;
mod memory;

pub use file::FileStore;
pub use keychain::KeyringStore;
pub use memory::MemoryStore;

use crate::api::Workspace;
use crate::i18n::Language;
use std::sync::Arc;
use thiserror::Error;

pub const KEYRING_SERVICE: &str = "gipoly";

pub const TOKEN_KEY: &str = "gipoly-token";
pub const LANGUAGE_KEY: &str = "gipoly-language";
pub const CURRENT_WORKSPACE_KEY: &str = "gipoly-current-workspace";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("Keychain error: {0}")]
    KeychainError(String),
}

/// A string-keyed, string-valued durable store. Writes are last-write-wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed view over the persisted keys.
///
/// The token lives in `secrets` (the OS keychain in the shipped binary); the
/// language and workspace snapshot live in `prefs`. Both may be the same store.
#[derive(Clone)]
pub struct PersistedStore {
    secrets: Arc<dyn KeyValueStore>,
    prefs: Arc<dyn KeyValueStore>,
}

impl PersistedStore {
    pub fn new(secrets: Arc<dyn KeyValueStore>, prefs: Arc<dyn KeyValueStore>) -> Self {
        Self { secrets, prefs }
    }

    /// Single backing store for every key.
    pub fn single(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            secrets: store.clone(),
            prefs: store,
        }
    }

    /// Unreadable tokens count as absent.
    pub fn token(&self) -> Option<String> {
        match self.secrets.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                log::warn!("Failed to read stored token: {}", e);
                None
            }
        }
    }

    pub fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.secrets.set(TOKEN_KEY, token)
    }

    pub fn clear_token(&self) -> Result<(), StorageError> {
        self.secrets.remove(TOKEN_KEY)
    }

    pub fn language(&self) -> Language {
        match self.prefs.get(LANGUAGE_KEY) {
            Ok(Some(code)) => Language::from_code(&code).unwrap_or_else(|| {
                log::warn!("Ignoring unsupported stored language '{}'", code);
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(e) => {
                log::warn!("Failed to read stored language: {}", e);
                Language::default()
            }
        }
    }

    pub fn set_language(&self, language: Language) -> Result<(), StorageError> {
        self.prefs.set(LANGUAGE_KEY, language.code())
    }

    /// The persisted snapshot, if present and parseable. A corrupt snapshot
    /// is treated as absent.
    pub fn current_workspace(&self) -> Option<Workspace> {
        let raw = match self.prefs.get(CURRENT_WORKSPACE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("Failed to read workspace snapshot: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(workspace) => Some(workspace),
            Err(e) => {
                log::warn!("Discarding unreadable workspace snapshot: {}", e);
                None
            }
        }
    }

    pub fn set_current_workspace(&self, workspace: &Workspace) -> Result<(), StorageError> {
        let raw = serde_json::to_string(workspace)?;
        self.prefs.set(CURRENT_WORKSPACE_KEY, &raw)
    }
}

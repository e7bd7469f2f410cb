pub mod api;
pub mod cli;
pub mod error;
pub mod i18n;
pub mod notification;
pub mod session;
pub mod settings;
pub mod state;
pub mod storage;
pub mod tools;
pub mod workspace;

#[cfg(test)]
mod testing;

use api::ApiClient;
use clap::Parser;
use notification::NotificationQueue;
use settings::{ClientSettings, TokenBackend};
use state::AppState;
use std::sync::Arc;
use storage::{FileStore, KeyValueStore, KeyringStore, PersistedStore, KEYRING_SERVICE};

fn open_store(settings: &ClientSettings) -> PersistedStore {
    let prefs: Arc<dyn KeyValueStore> = Arc::new(FileStore::default_location());
    match settings.token_backend {
        TokenBackend::Keyring => PersistedStore::new(Arc::new(KeyringStore::new(KEYRING_SERVICE)), prefs),
        TokenBackend::File => PersistedStore::single(prefs),
    }
}

pub fn run() -> anyhow::Result<()> {
    env_logger::init();

    let cli = cli::Cli::parse();

    // Load or fall back to default settings
    let settings = settings::load_settings().unwrap_or_else(|e| {
        log::warn!("Failed to load settings, using defaults: {}", e);
        ClientSettings::default()
    });

    let api_url = settings.api_url();
    log::info!("Using backend at {}", api_url);
    let backend = Arc::new(ApiClient::new(api_url, settings.request_timeout())?);
    let notifications = NotificationQueue::new(settings.notification_timeout());
    let store = open_store(&settings);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let mut state = AppState::new(backend, store, notifications);
        if cli.command.needs_session() {
            state.init().await;
        }

        let outcome = cli::execute(cli.command, &mut state, cli.format).await;
        let notice = state.notifications().current();

        match outcome {
            Ok(()) => {
                if let Some(notice) = notice {
                    eprintln!("{}", notice.message);
                }
                Ok(())
            }
            Err(e) => {
                log::debug!("Command failed: {:?}", e);
                // the notification already carries the localized text
                match notice {
                    Some(notice) => Err(anyhow::anyhow!(notice.message)),
                    None => Err(e),
                }
            }
        }
    })
}

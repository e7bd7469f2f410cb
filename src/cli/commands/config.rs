use super::print_json;
use crate::cli::OutputFormat;
use crate::settings::{self, TokenBackend};
use crate::storage::FileStore;

pub fn run(
    api_url: Option<String>,
    token_backend: Option<TokenBackend>,
    notification_timeout_ms: Option<u64>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut current = settings::load_settings()?;
    let changed = api_url.is_some() || token_backend.is_some() || notification_timeout_ms.is_some();

    if let Some(url) = api_url {
        current.api_url = Some(url.trim().trim_end_matches('/').to_string()).filter(|u| !u.is_empty());
    }
    if let Some(backend) = token_backend {
        current.token_backend = backend;
    }
    if let Some(ms) = notification_timeout_ms {
        current.notification_timeout_ms = Some(ms);
    }
    if changed {
        settings::save_settings(&current)?;
    }

    if format == OutputFormat::Json {
        return print_json(&current);
    }

    println!("settings file:  {}", settings::get_settings_path().display());
    println!("store file:     {}", FileStore::default_location().path().display());
    println!("api url:        {}", current.api_url());
    println!("token backend:  {:?}", current.token_backend);
    println!("request timeout: {}s", current.request_timeout().as_secs());
    println!("notifications:  {}ms", current.notification_timeout().as_millis());
    Ok(())
}

use super::{or_dash, print_json};
use crate::api::{ProfileUpdate, User};
use crate::cli::OutputFormat;
use crate::i18n::Language;
use crate::state::AppState;

pub async fn login(state: &mut AppState, email: &str, password: &str, format: OutputFormat) -> anyhow::Result<()> {
    let user = state.login(email, password).await?;
    print_user(state, &user, format)
}

pub async fn register(
    state: &mut AppState,
    email: &str,
    password: &str,
    full_name: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let user = state.register(email, password, full_name).await?;
    print_user(state, &user, format)
}

pub fn whoami(state: &AppState, format: OutputFormat) -> anyhow::Result<()> {
    match state.user() {
        Some(user) => print_user(state, user, format),
        None if format == OutputFormat::Json => print_json(&serde_json::Value::Null),
        None => {
            println!("Not logged in");
            Ok(())
        }
    }
}

pub fn language(state: &mut AppState, language: Option<Language>) -> anyhow::Result<()> {
    match language {
        Some(language) => state.set_language(language)?,
        None => println!("{}", state.language()),
    }
    Ok(())
}

pub async fn profile(
    state: &mut AppState,
    full_name: Option<String>,
    website_url: Option<String>,
    store_platform: Option<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let update = ProfileUpdate {
        full_name,
        website_url,
        store_platform,
    };
    let user = state.update_profile(&update).await?;
    print_user(state, &user, format)
}

fn print_user(state: &AppState, user: &User, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "user": user,
            "current_workspace": state.current_workspace(),
        }));
    }

    println!("{} <{}>", user.display_name(), user.email);
    println!("  website:   {}", or_dash(user.website_url.as_deref()));
    println!("  platform:  {}", or_dash(user.store_platform.as_deref()));
    println!(
        "  workspace: {}",
        or_dash(state.current_workspace().map(|w| w.slug.as_str()))
    );
    Ok(())
}

pub mod account;
pub mod ad;
pub mod config;
pub mod seo;
pub mod trend;
pub mod workspaces;

use chrono::{DateTime, Local, Utc};

/// Serialize a value as pretty-printed JSON and print it to stdout.
fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}:", title);
    for item in items {
        println!("  - {}", item);
    }
}

fn local_time(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

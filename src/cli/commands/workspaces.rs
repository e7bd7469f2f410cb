use super::{or_dash, print_json};
use crate::api::{Workspace, WorkspaceInput};
use crate::cli::{OutputFormat, WorkspaceCommand};
use crate::state::AppState;

pub async fn run(state: &mut AppState, command: WorkspaceCommand, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        WorkspaceCommand::List => list(state, format),
        WorkspaceCommand::Select { slug } => {
            let workspace = state.select_workspace(&slug).await?;
            print_workspace(&workspace, format)
        }
        WorkspaceCommand::Create {
            name,
            store_url,
            store_platform,
        } => {
            let input = WorkspaceInput {
                name: Some(name),
                store_url,
                store_platform,
            };
            let workspace = state.create_workspace(&input).await?;
            print_workspace(&workspace, format)
        }
        WorkspaceCommand::Update {
            slug,
            name,
            store_url,
            store_platform,
        } => {
            let input = WorkspaceInput {
                name,
                store_url,
                store_platform,
            };
            let workspace = state.update_workspace(&slug, &input).await?;
            print_workspace(&workspace, format)
        }
        WorkspaceCommand::Delete { slug } => {
            state.delete_workspace(&slug).await?;
            Ok(())
        }
    }
}

fn list(state: &AppState, format: OutputFormat) -> anyhow::Result<()> {
    let workspaces = state.workspaces().workspaces();
    if format == OutputFormat::Json {
        return print_json(&workspaces);
    }

    if workspaces.is_empty() {
        println!("No workspaces");
        return Ok(());
    }

    let current = state.current_workspace().map(|w| w.id);
    for workspace in workspaces {
        let marker = if Some(workspace.id) == current { "*" } else { " " };
        println!(
            "{} {:<24} {:<24} {}",
            marker,
            workspace.slug,
            workspace.name,
            or_dash(workspace.store_platform.as_deref())
        );
    }
    Ok(())
}

fn print_workspace(workspace: &Workspace, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(workspace);
    }
    println!("{} ({})", workspace.name, workspace.slug);
    println!("  store:    {}", or_dash(workspace.store_url.as_deref()));
    println!("  platform: {}", or_dash(workspace.store_platform.as_deref()));
    Ok(())
}

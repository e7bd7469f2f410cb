pub mod commands;

use crate::i18n::Language;
use crate::settings::TokenBackend;
use crate::state::AppState;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "gipoly")]
#[command(author, version, about = "Gipoly account, workspaces and AI tools", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and remember the session
    Login {
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Create an account and log in
    Register {
        email: String,

        #[arg(short, long)]
        password: String,

        /// Full name shown in the app
        #[arg(long)]
        full_name: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user and current workspace
    Whoami,

    /// Show or set the UI language (en, tr)
    Language { language: Option<Language> },

    /// Update profile fields
    Profile {
        #[arg(long)]
        full_name: Option<String>,

        #[arg(long)]
        website_url: Option<String>,

        /// e.g. shopify, trendyol, woocommerce
        #[arg(long)]
        store_platform: Option<String>,
    },

    /// Change the account password
    Password {
        #[arg(long)]
        current: String,

        #[arg(long)]
        new: String,

        #[arg(long)]
        confirm: String,
    },

    /// Show or change client settings
    Config {
        /// Backend base URL
        #[arg(long)]
        api_url: Option<String>,

        /// Where the session token is kept
        #[arg(long)]
        token_backend: Option<TokenBackend>,

        /// How long notifications stay visible
        #[arg(long)]
        notification_timeout_ms: Option<u64>,
    },

    /// Manage workspaces
    #[command(subcommand)]
    Workspaces(WorkspaceCommand),

    /// Trend agent: product ideas for a market
    #[command(subcommand)]
    Trend(TrendCommand),

    /// SEO strategist
    #[command(subcommand)]
    Seo(SeoCommand),

    /// Ad creative generator
    #[command(subcommand)]
    Ad(AdCommand),
}

#[derive(Debug, Subcommand)]
pub enum WorkspaceCommand {
    /// List workspaces, marking the current one
    List,

    /// Make a workspace current
    Select { slug: String },

    /// Create a workspace and make it current
    Create {
        name: String,

        #[arg(long)]
        store_url: Option<String>,

        #[arg(long)]
        store_platform: Option<String>,
    },

    /// Update a workspace
    Update {
        slug: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        store_url: Option<String>,

        #[arg(long)]
        store_platform: Option<String>,
    },

    /// Delete a workspace
    Delete { slug: String },
}

#[derive(Debug, Subcommand)]
pub enum TrendCommand {
    /// Ask for product suggestions
    Suggest {
        #[arg(long)]
        category: Option<String>,

        /// ISO country code
        #[arg(long, default_value = "TR")]
        country: String,

        #[arg(long)]
        budget: Option<String>,

        #[arg(long)]
        audience: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Number of products (1-5)
        #[arg(short = 'n', long, default_value = "3")]
        count: u8,

        /// Skip Google Trends data
        #[arg(long)]
        no_trends: bool,
    },

    /// List saved suggestions
    History,

    /// Show one saved suggestion
    Show { id: i64 },

    /// Delete a saved suggestion
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum SeoCommand {
    /// Analyze product copy
    Manual {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: String,

        /// Comma separated target keywords
        #[arg(long)]
        keywords: Option<String>,
    },

    /// Audit a live product page
    Url { url: String },

    /// List saved analyses
    History,

    /// Show one saved analysis
    Show { id: i64 },

    /// Delete a saved analysis
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum AdCommand {
    /// Generate ad copy and a visual
    Generate {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: String,

        /// Instagram, TikTok, Meta or Google Ads
        #[arg(long)]
        platform: String,

        /// Sales, Traffic or Awareness
        #[arg(long)]
        goal: String,

        /// Audience age range, e.g. 20-30
        #[arg(long)]
        age: String,

        /// Audience interests
        #[arg(long, value_delimiter = ',')]
        interests: Vec<String>,
    },

    /// List saved ad creatives
    History,

    /// Show one saved ad creative
    Show { id: i64 },

    /// Delete a saved ad creative
    Delete { id: i64 },
}

impl Commands {
    /// `config` runs without restoring the session: a token check against a
    /// broken `api_url` would clear the stored token.
    pub fn needs_session(&self) -> bool {
        !matches!(self, Commands::Config { .. })
    }
}

/// Runs one command. `state` is initialized when `needs_session` says so.
pub async fn execute(command: Commands, state: &mut AppState, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => commands::account::login(state, &email, &password, format).await,
        Commands::Register {
            email,
            password,
            full_name,
        } => commands::account::register(state, &email, &password, &full_name, format).await,
        Commands::Logout => {
            state.logout()?;
            Ok(())
        }
        Commands::Whoami => commands::account::whoami(state, format),
        Commands::Language { language } => commands::account::language(state, language),
        Commands::Profile {
            full_name,
            website_url,
            store_platform,
        } => commands::account::profile(state, full_name, website_url, store_platform, format).await,
        Commands::Password { current, new, confirm } => {
            state.change_password(&current, &new, &confirm).await?;
            Ok(())
        }
        Commands::Config {
            api_url,
            token_backend,
            notification_timeout_ms,
        } => commands::config::run(api_url, token_backend, notification_timeout_ms, format),
        Commands::Workspaces(command) => commands::workspaces::run(state, command, format).await,
        Commands::Trend(command) => commands::trend::run(state, command, format).await,
        Commands::Seo(command) => commands::seo::run(state, command, format).await,
        Commands::Ad(command) => commands::ad::run(state, command, format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_nested_commands() {
        let cli = Cli::parse_from(["gipoly", "workspaces", "create", "My Shop", "--store-platform", "shopify"]);
        match cli.command {
            Commands::Workspaces(WorkspaceCommand::Create {
                name, store_platform, ..
            }) => {
                assert_eq!(name, "My Shop");
                assert_eq!(store_platform.as_deref(), Some("shopify"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parses_interest_list_and_language() {
        let cli = Cli::parse_from([
            "gipoly", "--format", "json", "ad", "generate", "--name", "Blender", "--description", "Portable",
            "--platform", "TikTok", "--goal", "Sales", "--age", "18-24", "--interests", "fitness,cooking",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Ad(AdCommand::Generate { interests, .. }) => {
                assert_eq!(interests, vec!["fitness", "cooking"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::parse_from(["gipoly", "language", "TR"]);
        assert!(matches!(cli.command, Commands::Language { language: Some(Language::Tr) }));
    }

    #[test]
    fn test_parses_config_flags() {
        let cli = Cli::parse_from(["gipoly", "config", "--token-backend", "file"]);
        assert!(matches!(
            cli.command,
            Commands::Config {
                token_backend: Some(TokenBackend::File),
                api_url: None,
                ..
            }
        ));
    }

    #[test]
    fn test_only_config_skips_session() {
        let config = Cli::parse_from(["gipoly", "config", "--api-url", "http://localhost:9000"]);
        assert!(!config.command.needs_session());

        let others = [
            vec!["gipoly", "whoami"],
            vec!["gipoly", "logout"],
            vec!["gipoly", "workspaces", "list"],
        ];
        for args in others {
            assert!(Cli::parse_from(args).command.needs_session());
        }
    }

    #[test]
    fn test_trend_defaults() {
        let cli = Cli::parse_from(["gipoly", "trend", "suggest"]);
        match cli.command {
            Commands::Trend(TrendCommand::Suggest {
                country, count, no_trends, ..
            }) => {
                assert_eq!(country, "TR");
                assert_eq!(count, 3);
                assert!(!no_trends);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}

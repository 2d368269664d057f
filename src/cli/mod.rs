pub mod client;
pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "TaskFlow CLI - command-line client for the TaskFlow API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output raw JSON responses")]
    pub json: bool,

    #[arg(long, global = true, help = "Server URL (saved for later commands)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Register, log in and manage the current session")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "List, create, edit and delete tasks")]
    Task {
        #[command(subcommand)]
        cmd: commands::task::TaskCommands,
    },

    #[command(about = "Task comments")]
    Comment {
        #[command(subcommand)]
        cmd: commands::comment::CommentCommands,
    },

    #[command(about = "Profile and account management (requires login)")]
    Profile {
        #[command(subcommand)]
        cmd: commands::profile::ProfileCommands,
    },

    #[command(about = "Check server health")]
    Health,

    #[command(about = "Show the server's endpoint map")]
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let mut session = config::load_session()?;
    if let Some(server) = cli.server.or_else(|| std::env::var("TASKFLOW_SERVER").ok()) {
        if server != session.server {
            session.server = server;
            config::save_session(&session)?;
        }
    }

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, session, output_format).await,
        Commands::Task { cmd } => commands::task::handle(cmd, session, output_format).await,
        Commands::Comment { cmd } => commands::comment::handle(cmd, session, output_format).await,
        Commands::Profile { cmd } => commands::profile::handle(cmd, session, output_format).await,
        Commands::Health => commands::server::health(session, output_format).await,
        Commands::Info => commands::server::info(session, output_format).await,
    }
}

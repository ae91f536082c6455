pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "potluck")]
#[command(about = "Potluck CLI - Command-line front end for the sign-up list API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        help = "Base URL of the API server (default: POTLUCK_SERVER or http://localhost:3000)"
    )]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "View and edit the sign-up list")]
    Items {
        #[command(subcommand)]
        cmd: commands::items::ItemsCommands,
    },

    #[command(about = "Remote server checks")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },
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

fn resolve_base_url(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var("POTLUCK_SERVER").ok())
        .unwrap_or_else(|| "http://localhost:3000".to_string())
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let base_url = resolve_base_url(cli.server.clone());

    match cli.command {
        Commands::Items { cmd } => commands::items::handle(cmd, output_format, &base_url).await,
        Commands::Server { cmd } => commands::server::handle(cmd, output_format, &base_url).await,
    }
}

pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "creations-admin")]
#[command(about = "Operator CLI for the Creations API: usage counters, creations and tokens")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Inspect and adjust free usage counters")]
    Usage {
        #[command(subcommand)]
        cmd: commands::usage::UsageCommands,
    },

    #[command(about = "List stored creations")]
    Creations {
        #[command(subcommand)]
        cmd: commands::creations::CreationCommands,
    },

    #[command(about = "Mint bearer tokens for testing")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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

    match cli.command {
        Commands::Usage { cmd } => commands::usage::handle(cmd, output_format).await,
        Commands::Creations { cmd } => commands::creations::handle(cmd, output_format).await,
        Commands::Token { cmd } => commands::token::handle(cmd, output_format).await,
    }
}

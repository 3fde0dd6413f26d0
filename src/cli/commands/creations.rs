use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::{Creation, DatabaseManager};
use crate::ledger::{CreationLedger, PgCreationLedger};

#[derive(Subcommand)]
pub enum CreationCommands {
    #[command(about = "List a user's creations, newest first")]
    List {
        #[arg(help = "User id at the identity provider")]
        user: String,
    },

    #[command(about = "List published creations, newest first")]
    Published,
}

pub async fn handle(cmd: CreationCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect_lazy(&config::config().database)?;
    let ledger = PgCreationLedger::new(pool);

    let creations = match cmd {
        CreationCommands::List { user } => ledger.list_by_user(&user).await?,
        CreationCommands::Published => ledger.list_published().await?,
    };

    if creations.is_empty() {
        return output_empty_collection(&output_format, "creations", "No creations found");
    }

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "creations": creations }))?);
        }
        OutputFormat::Text => print_table(&creations),
    }

    Ok(())
}

fn print_table(creations: &[Creation]) {
    println!(
        "{:<8} {:<14} {:<10} {:<6} {:<17} {}",
        "ID", "TYPE", "PUBLISHED", "LIKES", "CREATED", "PROMPT"
    );
    println!("{}", "-".repeat(100));

    for c in creations {
        println!(
            "{:<8} {:<14} {:<10} {:<6} {:<17} {}",
            c.id,
            c.kind.as_str(),
            if c.publish { "yes" } else { "no" },
            c.likes.len(),
            c.created_at.format("%Y-%m-%d %H:%M"),
            truncate(&c.prompt, 40)
        );
    }
}

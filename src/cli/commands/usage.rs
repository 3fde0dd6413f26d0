use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config;
use crate::quota::{QuotaStore, UsageRecord};
use crate::services;

#[derive(Subcommand)]
pub enum UsageCommands {
    #[command(about = "Show plan and free usage for a user")]
    Show {
        #[arg(help = "User id at the identity provider")]
        user: String,
    },

    #[command(about = "Overwrite the free usage counter")]
    Set {
        #[arg(help = "User id at the identity provider")]
        user: String,
        #[arg(help = "New counter value")]
        count: u32,
    },

    #[command(about = "Reset the free usage counter to zero")]
    Reset {
        #[arg(help = "User id at the identity provider")]
        user: String,
    },
}

pub async fn handle(cmd: UsageCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config::config();
    let store = services::quota_store(config)?;
    let limit = config.quota.free_usage_limit;

    match cmd {
        UsageCommands::Show { user } => {
            let usage = store.get_usage(&user).await?;
            print_usage(&output_format, &user, &usage, limit)
        }
        UsageCommands::Set { user, count } => {
            store.set_usage(&user, count).await?;
            output_success(
                &output_format,
                &format!("Set free usage of '{}' to {}", user, count),
                Some(json!({ "user_id": user, "free_usage": count })),
            )
        }
        UsageCommands::Reset { user } => {
            store.set_usage(&user, 0).await?;
            output_success(
                &output_format,
                &format!("Reset free usage of '{}'", user),
                Some(json!({ "user_id": user, "free_usage": 0 })),
            )
        }
    }
}

fn print_usage(
    output_format: &OutputFormat,
    user: &str,
    usage: &UsageRecord,
    limit: u32,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "user_id": user,
                    "plan": usage.plan,
                    "free_usage": usage.free_usage,
                    "free_usage_limit": limit,
                }))?
            );
        }
        OutputFormat::Text => {
            println!("User:       {}", user);
            println!("Plan:       {}", usage.plan);
            println!("Free usage: {}/{}", usage.free_usage, limit);
        }
    }
    Ok(())
}

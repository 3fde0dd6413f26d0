use clap::Subcommand;
use serde_json::json;

use crate::auth;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a bearer token signed with AUTH_JWT_SECRET")]
    Issue {
        #[arg(help = "User id placed in the `sub` claim")]
        user: String,

        #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
        ttl_hours: Option<i64>,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { user, ttl_hours } => {
            let security = &config::config().security;
            let hours = ttl_hours.unwrap_or(security.jwt_expiry_hours as i64);
            let token = auth::issue_token(&security.jwt_secret, &user, chrono::Duration::hours(hours))?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    &format!("Issued token for '{}'", user),
                    Some(json!({ "token": token, "expires_in_hours": hours })),
                ),
                // Bare token so the output can be captured by a shell
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}

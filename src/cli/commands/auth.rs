use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::client::ApiClient;
use crate::config::config;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the API")]
    Login {
        #[arg(help = "Username (email)")]
        username: String,
        #[arg(long, help = "Password (reads KWAI_PASSWORD or stdin when omitted)")]
        password: Option<String>,
    },

    #[command(about = "Logout from the API")]
    Logout,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::from_config(config())?;

    match cmd {
        AuthCommands::Login { username, password } => {
            let password = match password.or_else(|| std::env::var("KWAI_PASSWORD").ok()) {
                Some(password) => password,
                None => read_password()?,
            };
            client.login(&username, &password).await?;
            output_success(
                &output_format,
                &format!("Logged in as {}", username),
                Some(json!({ "username": username, "server": client.base_url() })),
            )
        }
        AuthCommands::Logout => {
            client.logout().await?;
            output_success(&output_format, "Logged out", None)
        }
    }
}

fn read_password() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin().read_line(&mut line).context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

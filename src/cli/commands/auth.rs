use clap::Subcommand;
use serde_json::json;

use crate::cli::{utils, ApiClient, OutputFormat};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Exchange credentials for a bearer token")]
    Login {
        #[arg(help = "User name")]
        user_name: String,
        #[arg(long, help = "Password")]
        password: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { user_name, password } => {
            let token = client.authenticate(&user_name, password.as_deref()).await?;
            match output_format {
                OutputFormat::Json => utils::output_success(
                    output_format,
                    &format!("Authenticated as {}", user_name),
                    Some(json!({ "token": token })),
                ),
                // Raw token so `export CITYINFO_TOKEN=$(cityinfo auth login kevin)` works
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}

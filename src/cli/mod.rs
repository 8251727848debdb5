pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::types::ApiVersion;

pub use client::ApiClient;

#[derive(Parser)]
#[command(name = "cityinfo")]
#[command(about = "City Info CLI - command-line client for the City Info API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, env = "CITYINFO_SERVER", default_value = "http://127.0.0.1:3000", help = "Base URL of the API server")]
    pub server: String,

    #[arg(long, global = true, env = "CITYINFO_TOKEN", hide_env_values = true, help = "Bearer token for protected routes")]
    pub token: Option<String>,

    #[arg(long, global = true, default_value = "v1", value_parser = parse_api_version, help = "API version to call (v1 or v2)")]
    pub api_version: ApiVersion,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and token acquisition")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Browse cities")]
    Cities {
        #[command(subcommand)]
        cmd: commands::cities::CityCommands,
    },

    #[command(about = "Manage points of interest of a city")]
    Poi {
        #[command(subcommand)]
        cmd: commands::poi::PoiCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
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

fn parse_api_version(value: &str) -> Result<ApiVersion, String> {
    ApiVersion::parse(value).ok_or_else(|| format!("unsupported API version '{}', expected v1 or v2", value))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = ApiClient::new(&cli.server, cli.api_version, cli.token);

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &client, output_format).await,
        Commands::Cities { cmd } => commands::cities::handle(cmd, &client, output_format).await,
        Commands::Poi { cmd } => commands::poi::handle(cmd, &client, output_format).await,
    }
}

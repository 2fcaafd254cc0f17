pub mod commands;
pub mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::config;
use crate::schema::SchemaRegistry;
use crate::transform::{TransformOptions, Transformer};

#[derive(Parser)]
#[command(name = "kwai")]
#[command(about = "kwai CLI - JSON:API documents and resources of the kwai portal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long = "schemas", global = true, help = "Extra resource descriptor file (.yaml, .yml or .json)")]
    pub schemas: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Validate a JSON:API document and map it to domain objects")]
    Transform(commands::transform::TransformArgs),

    #[command(about = "Build a JSON:API write payload from a domain object")]
    Payload(commands::transform::PayloadArgs),

    #[command(about = "Registered resource descriptors")]
    Schema {
        #[command(subcommand)]
        cmd: commands::schema::SchemaCommands,
    },

    #[command(about = "Fetch a resource or list from the API and map it")]
    Fetch(commands::fetch::FetchArgs),

    #[command(about = "Authentication against the API")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
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

/// The built-in kwai descriptors plus configured and command line descriptor files
pub fn load_registry(extra: &[PathBuf]) -> anyhow::Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::kwai();
    for path in config().transform.schema_files.iter().chain(extra) {
        registry
            .load_file(path)
            .with_context(|| format!("failed to load descriptors from {}", path.display()))?;
    }
    Ok(registry)
}

pub fn transformer(extra: &[PathBuf]) -> anyhow::Result<Arc<Transformer>> {
    let registry = load_registry(extra)?;
    Ok(Arc::new(
        Transformer::new(Arc::new(registry)).with_options(TransformOptions::from_config(config())),
    ))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let schemas = cli.schemas;

    match cli.command {
        Commands::Transform(args) => commands::transform::handle_transform(args, &schemas, output_format),
        Commands::Payload(args) => commands::transform::handle_payload(args, &schemas, output_format),
        Commands::Schema { cmd } => commands::schema::handle(cmd, &schemas, output_format),
        Commands::Fetch(args) => commands::fetch::handle(args, &schemas, output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
    }
}

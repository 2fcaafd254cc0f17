use anyhow::anyhow;
use clap::Subcommand;
use serde_json::json;
use std::path::PathBuf;

use crate::cli::utils::output_empty_collection;
use crate::cli::{load_registry, OutputFormat};

#[derive(Subcommand)]
pub enum SchemaCommands {
    #[command(about = "List registered descriptors")]
    List,

    #[command(about = "Show one descriptor")]
    Show {
        #[arg(help = "Descriptor name")]
        name: String,
    },
}

pub fn handle(cmd: SchemaCommands, schemas: &[PathBuf], output_format: OutputFormat) -> anyhow::Result<()> {
    let registry = load_registry(schemas)?;

    match cmd {
        SchemaCommands::List => {
            let names = registry.names();
            if names.is_empty() {
                return output_empty_collection(&output_format, "schemas", "No descriptors registered");
            }
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "schemas": names }))?),
                OutputFormat::Text => {
                    for name in names {
                        if let Some(descriptor) = registry.get(name) {
                            println!(
                                "{:<32} type={} attributes={} relationships={}",
                                name,
                                descriptor.resource_type,
                                descriptor.attributes.len(),
                                descriptor.relationships.len()
                            );
                        }
                    }
                }
            }
            Ok(())
        }
        SchemaCommands::Show { name } => {
            let descriptor = registry
                .get(&name)
                .ok_or_else(|| anyhow!("No resource descriptor registered as '{}'", name))?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(descriptor)?),
                OutputFormat::Text => print!("{}", serde_yaml::to_string(descriptor)?),
            }
            Ok(())
        }
    }
}

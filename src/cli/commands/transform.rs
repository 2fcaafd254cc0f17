use clap::Args;
use serde_json::json;
use std::path::PathBuf;

use crate::cli::utils::{output_error, output_success, output_transformed, read_json_input};
use crate::cli::{transformer, OutputFormat};
use crate::error::TransformError;

#[derive(Args)]
pub struct TransformArgs {
    #[arg(help = "Descriptor name of the primary data, e.g. teams")]
    pub schema: String,
    #[arg(long, help = "Document file (reads stdin when omitted)")]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct PayloadArgs {
    #[arg(help = "Descriptor name of the domain object, e.g. teams")]
    pub schema: String,
    #[arg(long, help = "Domain object file (reads stdin when omitted)")]
    pub file: Option<PathBuf>,
}

pub fn handle_transform(args: TransformArgs, schemas: &[PathBuf], output_format: OutputFormat) -> anyhow::Result<()> {
    let transformer = transformer(schemas)?;
    let raw = read_json_input(args.file.as_deref())?;

    match transformer.transform_document(&args.schema, raw) {
        Ok(transformed) => output_transformed(&output_format, &transformed),
        Err(TransformError::Validation(err)) => {
            output_violations(&output_format, &err)?;
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

pub fn handle_payload(args: PayloadArgs, schemas: &[PathBuf], output_format: OutputFormat) -> anyhow::Result<()> {
    let transformer = transformer(schemas)?;
    let object = read_json_input(args.file.as_deref())?;
    let payload = transformer.json_to_write_payload(&args.schema, &object)?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&payload)?),
        OutputFormat::Text => {
            let verb = if payload.resource().and_then(|r| r.id.as_ref()).is_some() { "PATCH" } else { "POST" };
            output_success(&output_format, &format!("Write payload for {} ({})", args.schema, verb), None)?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }
    Ok(())
}

fn output_violations(output_format: &OutputFormat, err: &crate::schema::ValidationError) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "error_code": "VALIDATION_ERROR",
                    "violations": err.violations,
                }))?
            );
        }
        OutputFormat::Text => {
            output_error(output_format, "document failed validation", None)?;
            for violation in &err.violations {
                eprintln!("  {}", violation);
            }
        }
    }
    Ok(())
}

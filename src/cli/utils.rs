use anyhow::Context;
use serde_json::{json, Value};
use std::io::Read;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::transform::{DomainObject, Transformed};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    collection_name: []
                }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Output mapped domain objects: the full structure for JSON, one line per item for text
pub fn output_transformed(output_format: &OutputFormat, transformed: &Transformed<DomainObject>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(transformed)?);
        }
        OutputFormat::Text => match transformed {
            Transformed::Single(object) => {
                println!("{} {}", object.resource_type, object.id.as_deref().unwrap_or("<new>"));
                println!("{}", serde_json::to_string_pretty(object)?);
            }
            Transformed::Collection(page) => {
                if page.is_empty() {
                    return output_empty_collection(output_format, "items", "No resources");
                }
                println!(
                    "{} item(s), count {}, offset {}, limit {}",
                    page.len(),
                    page.meta.count,
                    page.meta.offset,
                    page.meta.limit
                );
                for item in &page.items {
                    println!("{}", serde_json::to_string(item)?);
                }
            }
        },
    }
    Ok(())
}

/// Read a JSON value from a file, or from stdin when no file is given
pub fn read_json_input(file: Option<&Path>) -> anyhow::Result<Value> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer).context("failed to read stdin")?;
            buffer
        }
    };
    serde_json::from_str(&content).context("input is not valid JSON")
}

use anyhow::anyhow;
use clap::Args;
use std::path::PathBuf;

use crate::cli::utils::{output_error, output_transformed};
use crate::cli::{transformer, OutputFormat};
use crate::client::{ApiClient, QueryParams, ResourceApi};
use crate::config::config;

#[derive(Args)]
pub struct FetchArgs {
    #[arg(help = "Descriptor name of the primary data, e.g. teams")]
    pub schema: String,
    #[arg(help = "API path, e.g. /v1/teams")]
    pub path: String,
    #[arg(long, default_value_t = 0, help = "page[offset]")]
    pub offset: u64,
    #[arg(long, default_value_t = 0, help = "page[limit]")]
    pub limit: u64,
    #[arg(long = "filter", help = "Filter as name=value, e.g. team=3 (repeatable)")]
    pub filters: Vec<String>,
}

pub async fn handle(args: FetchArgs, schemas: &[PathBuf], output_format: OutputFormat) -> anyhow::Result<()> {
    let mut query = QueryParams::new().offset(args.offset).limit(args.limit);
    for filter in &args.filters {
        let (name, value) = filter
            .split_once('=')
            .ok_or_else(|| anyhow!("filter '{}' must look like name=value", filter))?;
        query = query.filter(name, value);
    }

    let client = ApiClient::from_config(config())?;
    let api = ResourceApi::new(client, transformer(schemas)?);

    match api.fetch_document(&args.schema, &args.path, &query).await {
        Ok(transformed) => output_transformed(&output_format, &transformed),
        Err(err) => {
            output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
            Err(err.into())
        }
    }
}

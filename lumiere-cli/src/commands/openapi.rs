//! Print the OpenAPI document

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use lumiere_server::http::openapi::openapi_json;

/// Arguments for the openapi command
#[derive(Parser, Debug)]
pub struct OpenapiArgs {
    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run_openapi(args: &OpenapiArgs) -> Result<()> {
    let json = openapi_json().context("Failed to serialize OpenAPI document")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote OpenAPI document to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

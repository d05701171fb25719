//! lumiere CLI - run and maintain the portfolio API
//!
//! - `serve`: HTTP API (runs migrations first unless `--no-migrate`)
//! - `migrate`: create or update the database schema
//! - `openapi`: print the OpenAPI document

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use lumiere_server::AppConfig;

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "lumiere",
    author,
    version,
    about = "Portfolio API for a food photographer",
    long_about = "Serve photos, categories and awards from PostgreSQL, accept image uploads \
                  to local disk or an object storage bucket, and proxy session lookups to \
                  an external auth provider."
)]
struct Cli {
    /// Debug logging (RUST_LOG still wins when set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    /// Config file (default: $XDG_CONFIG_HOME/lumiere/config.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create or update the database schema
    Migrate(commands::migrate::MigrateArgs),
    /// Print the OpenAPI document as JSON
    Openapi(commands::openapi::OpenapiArgs),
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    AppConfig::load(cli.config.as_deref()).context("failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .ok();

    let result = match &cli.command {
        Commands::Openapi(args) => commands::run_openapi(args),
        Commands::Migrate(args) => {
            let config = load_config(&cli)?;
            commands::run_migrate(args, config).await
        }
        Commands::Serve(args) => {
            let config = load_config(&cli)?;
            commands::run_serve(args, config).await
        }
    };

    tracing_setup::shutdown_otel();
    result
}

//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use lumiere_server::db::{create_pool, migrations};
use lumiere_server::AppConfig;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

pub async fn run_migrate(args: &MigrateArgs, mut config: AppConfig) -> Result<()> {
    if let Some(url) = &args.database_url {
        config.database.url = Some(url.clone());
    }
    let database_url = config
        .database_url()
        .context("Set it via --database-url, DATABASE_URL env, or .env")?;

    let pool = create_pool(database_url)
        .await
        .context("Failed to connect to database")?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!("Migrations complete");
    Ok(())
}

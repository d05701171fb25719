//! HTTP server command
//!
//! Flags override the loaded configuration, then the server runs until
//! Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use lumiere_server::db::{create_pool_with_options, migrations};
use lumiere_server::{run_server, AppConfig, AppState};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Directory local uploads are written to and served from
    #[arg(long)]
    pub upload_dir: Option<PathBuf>,

    /// Skip schema migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

impl ServeArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if self.cors_permissive {
            config.server.permissive_cors = true;
        }
        if let Some(url) = &self.database_url {
            config.database.url = Some(url.clone());
        }
        if let Some(dir) = &self.upload_dir {
            config.storage.upload_dir = dir.clone();
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: &ServeArgs, mut config: AppConfig) -> Result<()> {
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let database_url = config
        .database_url()
        .context("Set it via --database-url, DATABASE_URL env, or .env")?
        .to_string();

    let pool = create_pool_with_options(&database_url, config.database.max_connections)
        .await
        .context("Failed to create database pool")?;

    if args.no_migrate {
        tracing::info!("Skipping migrations");
    } else {
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    let settings = config.server.clone();
    let state = AppState::from_config(pool, config).context("Failed to set up providers")?;

    tracing::info!("Starting lumiere server on {}", settings.bind);

    // Blocks until shutdown
    run_server(state, &settings).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = ServeArgs::parse_from([
            "serve",
            "--bind",
            "0.0.0.0:8080",
            "--cors-permissive",
            "--database-url",
            "postgres://localhost/portfolio",
            "--upload-dir",
            "/srv/uploads",
        ]);
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.server.bind.to_string(), "0.0.0.0:8080");
        assert!(config.server.permissive_cors);
        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/portfolio"));
        assert_eq!(config.storage.upload_dir, PathBuf::from("/srv/uploads"));
    }

    #[test]
    fn absent_flags_keep_config() {
        let args = ServeArgs {
            bind: None,
            cors_permissive: false,
            database_url: None,
            upload_dir: None,
            no_migrate: false,
        };
        let mut config = AppConfig::default();
        config.server.permissive_cors = true;
        args.apply(&mut config);

        assert!(config.server.permissive_cors);
        assert_eq!(config.server.bind.to_string(), "127.0.0.1:3000");
    }
}

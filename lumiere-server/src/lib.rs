//! lumiere-server: portfolio API for a food photographer
//!
//! Photos, categories and awards in PostgreSQL, uploads to local disk or
//! an object storage bucket, and a thin proxy to an external auth provider.
//!
//! # Example
//!
//! ```ignore
//! let config = AppConfig::load(None)?;
//! let pool = db::create_pool(config.database_url()?).await?;
//! db::migrations::run(&pool).await?;
//! let state = AppState::from_config(pool, config.clone())?;
//! http::run_server(state, &config.server).await?;
//! ```

pub mod auth;
pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod state;
pub mod storage;

pub use config::{AppConfig, ConfigError};
pub use http::{build_router, run_server, ApiDoc, ApiError};
pub use state::AppState;

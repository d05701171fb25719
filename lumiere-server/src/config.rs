//! Server configuration
//!
//! Layering, lowest to highest priority:
//! 1. Built-in defaults
//! 2. TOML file (explicit path, or `$XDG_CONFIG_HOME/lumiere/config.toml`)
//! 3. Environment (`.env` files are loaded first, existing vars win)
//! 4. CLI flags, applied by the binary after `AppConfig::load`

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default bind address
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Largest accepted local upload (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Request body cap on the media routes (25 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {reason}")]
    InvalidEnv { key: &'static str, reason: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
    /// Object storage and auth provider; uploads to a bucket and the auth
    /// routes answer 500 without it
    pub supabase: Option<SupabaseSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    /// Allow any origin instead of localhost only
    pub permissive_cors: bool,
    /// Extra origins allowed in addition to localhost
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            permissive_cors: false,
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: crate::db::pool::DEFAULT_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory local uploads are written to
    pub upload_dir: PathBuf,
    /// URL prefix the upload directory is served under
    pub public_prefix: String,
    pub max_upload_bytes: u64,
    pub max_body_bytes: usize,
    /// Bucket used when a bucket upload names none
    pub default_bucket: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("public/uploads"),
            public_prefix: "/uploads".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            default_bucket: "photos".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub anon_key: String,
    /// Used for storage writes when set, otherwise the anon key is sent
    #[serde(default)]
    pub service_role_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl SupabaseSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Key sent with storage requests
    pub fn storage_key(&self) -> &str {
        self.service_role_key.as_deref().unwrap_or(&self.anon_key)
    }
}

impl AppConfig {
    /// Load configuration from file (if any) and environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        load_dotenv();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/lumiere/config.toml` (platform equivalent elsewhere)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lumiere").join("config.toml"))
    }

    /// Override fields from environment variables.
    ///
    /// `lookup` is injected so tests do not touch the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("DATABASE_URL") {
            self.database.url = Some(url);
        }

        if let Some(bind) = get("LUMIERE_BIND") {
            self.server.bind = bind.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidEnv {
                    key: "LUMIERE_BIND",
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(dir) = get("LUMIERE_UPLOAD_DIR") {
            self.storage.upload_dir = PathBuf::from(dir);
        }

        match (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => {
                let timeout_secs = self
                    .supabase
                    .as_ref()
                    .map_or_else(default_timeout_secs, |s| s.timeout_secs);
                let service_role_key = self
                    .supabase
                    .as_ref()
                    .and_then(|s| s.service_role_key.clone());
                self.supabase = Some(SupabaseSettings {
                    url,
                    anon_key,
                    service_role_key,
                    timeout_secs,
                });
            }
            (Some(url), None) => match self.supabase.as_mut() {
                Some(supabase) => supabase.url = url,
                None => {
                    return Err(ConfigError::InvalidEnv {
                        key: "SUPABASE_ANON_KEY",
                        reason: "required when SUPABASE_URL is set".to_string(),
                    })
                }
            },
            (None, Some(anon_key)) => {
                if let Some(supabase) = self.supabase.as_mut() {
                    supabase.anon_key = anon_key;
                }
            }
            (None, None) => {}
        }

        if let Some(key) = get("SUPABASE_SERVICE_ROLE_KEY") {
            if let Some(supabase) = self.supabase.as_mut() {
                supabase.service_role_key = Some(key);
            }
        }

        Ok(())
    }

    /// Reject values the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.storage.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "storage.max_upload_bytes must be positive".to_string(),
            ));
        }
        let prefix = self.storage.public_prefix.trim_end_matches('/');
        if !prefix.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "storage.public_prefix must be an absolute path below '/': {}",
                self.storage.public_prefix
            )));
        }
        if let Some(supabase) = &self.supabase {
            if !(supabase.url.starts_with("http://") || supabase.url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "supabase.url must be an http(s) URL: {}",
                    supabase.url
                )));
            }
        }
        Ok(())
    }

    /// Database URL, required by commands that talk to Postgres.
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database
            .url
            .as_deref()
            .ok_or_else(|| ConfigError::Invalid("DATABASE_URL is not set".to_string()))
    }
}

/// Load `.env` from the current directory and from the lumiere config dir.
///
/// dotenvy never overwrites variables that are already set.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded .env from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => debug!("Failed to load .env: {}", e),
    }

    if let Some(env_file) = dirs::config_dir().map(|dir| dir.join("lumiere").join(".env")) {
        if env_file.exists() {
            if let Err(e) = dotenvy::from_path(&env_file) {
                debug!("Failed to load {}: {}", env_file.display(), e);
            }
        }
    }
}

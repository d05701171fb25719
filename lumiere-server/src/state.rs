//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{AuthError, AuthProvider, SupabaseAuth};
use crate::config::AppConfig;
use crate::storage::{LocalStore, ObjectStore, StorageError, SupabaseStorage};

/// Shared application state, handed to handlers as `State<Arc<AppState>>`
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: AppConfig,
    pub local_store: LocalStore,
    /// `None` when no provider is configured
    pub object_store: Option<Arc<dyn ObjectStore>>,
    /// `None` when no provider is configured
    pub auth: Option<Arc<dyn AuthProvider>>,
}

impl AppState {
    /// Build state with no provider clients.
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        let local_store = LocalStore::new(
            config.storage.upload_dir.clone(),
            config.storage.public_prefix.clone(),
            config.storage.max_upload_bytes,
        );
        Self {
            pool,
            config,
            local_store,
            object_store: None,
            auth: None,
        }
    }

    /// Build state with provider clients from `config.supabase`, if any.
    pub fn from_config(pool: PgPool, config: AppConfig) -> Result<Self, StateError> {
        let supabase = config.supabase.clone();
        let mut state = Self::new(pool, config);

        if let Some(settings) = supabase {
            tracing::info!(url = %settings.url, "Auth and object storage provider configured");
            state.object_store = Some(Arc::new(SupabaseStorage::new(&settings)?));
            state.auth = Some(Arc::new(SupabaseAuth::new(&settings)?));
        } else {
            tracing::warn!("No auth/storage provider configured; bucket uploads and auth routes are disabled");
        }

        Ok(state)
    }

    pub fn with_object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.object_store = Some(store);
        self
    }

    pub fn with_auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }
}

/// Failure building provider clients
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

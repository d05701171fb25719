//! Object storage buckets
//!
//! Provides a trait for bucket uploads, with:
//! - Real implementation against the provider's storage REST API
//! - In-memory implementation for tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::{header, Client};

use super::{StorageError, StoredFile, Upload};
use crate::config::SupabaseSettings;

/// Cache lifetime sent with every uploaded object (seconds)
pub const CACHE_CONTROL_SECS: u32 = 3600;

/// Trait for bucket uploads (testable)
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `bucket/key`, failing if the key already exists.
    ///
    /// Returns the object key as reported by the store.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError>;

    /// Public URL of an object
    fn public_url(&self, bucket: &str, key: &str) -> String;
}

/// Validate an upload and push it into `bucket` under a generated name.
///
/// Only the type is checked; size is bounded by the request body limit.
pub async fn upload_to_bucket(
    store: &dyn ObjectStore,
    bucket: &str,
    upload: &Upload,
) -> Result<StoredFile, StorageError> {
    upload.validate(None)?;
    validate_bucket(bucket)?;

    let key = upload.generate_file_name();
    let storage_path = store
        .put(bucket, &key, &upload.content_type, upload.bytes.clone())
        .await?;

    tracing::info!(bucket, key = %key, size = upload.size(), "Uploaded object");

    Ok(StoredFile {
        file_path: store.public_url(bucket, &key),
        file_size: upload.size(),
        mime_type: upload.content_type.clone(),
        width: None,
        height: None,
        storage_path: Some(storage_path),
    })
}

/// Bucket ids: lowercase letters, digits, `-`, `_` and `.`
fn validate_bucket(bucket: &str) -> Result<(), StorageError> {
    let valid = !bucket.is_empty()
        && bucket.len() <= 63
        && bucket
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'))
        && !bucket.contains("..");
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidBucket(bucket.to_string()))
    }
}

/// Storage REST client for a Supabase-compatible project
pub struct SupabaseStorage {
    http: Client,
    base_url: String,
    key: String,
}

impl SupabaseStorage {
    pub fn new(settings: &SupabaseSettings) -> Result<Self, StorageError> {
        let http = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            http,
            base_url: settings.url.trim_end_matches('/').to_string(),
            key: settings.storage_key().to_string(),
        })
    }
}

#[derive(Debug, serde::Deserialize)]
struct UploadResponse {
    #[serde(rename = "Key")]
    key: Option<String>,
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, key);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.key)
            .header("apikey", &self.key)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CACHE_CONTROL, format!("max-age={CACHE_CONTROL_SECS}"))
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(%status, bucket, key, "Storage upload rejected: {}", message);
            return Err(StorageError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        // The API reports "bucket/key"; callers want the key inside the bucket
        let body: UploadResponse = response.json().await?;
        let path = body
            .key
            .as_deref()
            .and_then(|k| k.strip_prefix(&format!("{bucket}/")).map(str::to_owned))
            .unwrap_or_else(|| key.to_string());
        Ok(path)
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, key
        )
    }
}

/// In-memory object store for testing
pub struct MemoryStore {
    base_url: String,
    objects: Mutex<HashMap<String, (String, Bytes)>>,
}

impl MemoryStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    /// Content type and bytes stored at `bucket/key`
    pub fn get(&self, bucket: &str, key: &str) -> Option<(String, Bytes)> {
        self.lock().get(&format!("{bucket}/{key}")).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (String, Bytes)>> {
        // A poisoned map is still a valid map
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError> {
        let mut objects = self.lock();
        let full_key = format!("{bucket}/{key}");
        if objects.contains_key(&full_key) {
            return Err(StorageError::Upstream {
                status: 409,
                message: "The resource already exists".to_string(),
            });
        }
        objects.insert(full_key, (content_type.to_string(), bytes));
        Ok(key.to_string())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/public/{}/{}", self.base_url, bucket, key)
    }
}

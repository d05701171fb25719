//! Upload ingestion
//!
//! Two destinations share one validation path:
//! - `LocalStore`: files under the configured upload directory, served back
//!   under the public prefix
//! - `ObjectStore`: a bucket behind the provider's storage REST API
//!
//! Nothing here resizes, hashes or deduplicates content.

pub mod bucket;
pub mod local;

use axum::body::Bytes;
use rand::Rng;
use serde::Serialize;
use utoipa::ToSchema;

pub use bucket::{upload_to_bucket, MemoryStore, ObjectStore, SupabaseStorage};
pub use local::LocalStore;

/// Accepted upload types
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Length of the random part of generated file names
const RANDOM_SUFFIX_LEN: usize = 13;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("No file provided")]
    MissingFile,

    #[error("Invalid file type. Only JPEG, PNG, and WebP are allowed.")]
    UnsupportedType { mime: String },

    #[error("File size too large. Maximum size is {}MB.", .max / (1024 * 1024))]
    TooLarge { size: u64, max: u64 },

    #[error("Invalid bucket name: {0}")]
    InvalidBucket(String),

    #[error("object storage is not configured")]
    NotConfigured,

    #[error("storage API returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// True when the client sent something unacceptable (as opposed to a
    /// failure on our side or upstream).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFile
                | Self::UnsupportedType { .. }
                | Self::TooLarge { .. }
                | Self::InvalidBucket(_)
        )
    }
}

/// File received from a multipart form
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-supplied file name, only used for its extension
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Check type against the allow-list and, when given, size against `max_bytes`.
    pub fn validate(&self, max_bytes: Option<u64>) -> Result<(), StorageError> {
        if !ALLOWED_MIME_TYPES.contains(&self.content_type.as_str()) {
            return Err(StorageError::UnsupportedType {
                mime: self.content_type.clone(),
            });
        }
        if let Some(max) = max_bytes {
            if self.size() > max {
                return Err(StorageError::TooLarge {
                    size: self.size(),
                    max,
                });
            }
        }
        Ok(())
    }

    /// Extension for the stored name: from the client file name when usable,
    /// otherwise from the MIME type.
    pub fn extension(&self) -> String {
        self.file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| {
                !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .unwrap_or_else(|| mime_extension(&self.content_type).to_string())
    }

    /// `<unix millis>-<13 base36 chars>.<ext>`
    pub fn generate_file_name(&self) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..RANDOM_SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        format!(
            "{}-{}.{}",
            chrono::Utc::now().timestamp_millis(),
            suffix,
            self.extension()
        )
    }
}

fn mime_extension(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

/// Where an upload ended up
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredFile {
    /// Public path (local) or public URL (bucket)
    pub file_path: String,
    pub file_size: u64,
    pub mime_type: String,
    /// Not detected; always null
    pub width: Option<i32>,
    /// Not detected; always null
    pub height: Option<i32>,
    /// Object key inside the bucket
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
}

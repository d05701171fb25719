//! Local disk uploads

use std::path::{Path, PathBuf};

use super::{StorageError, StoredFile, Upload};

/// Writes uploads into one directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
    public_prefix: String,
    max_bytes: u64,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>, max_bytes: u64) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Validate, then write the upload under a generated name.
    ///
    /// Nothing touches the filesystem until type and size have passed.
    pub async fn save(&self, upload: &Upload) -> Result<StoredFile, StorageError> {
        upload.validate(Some(self.max_bytes))?;

        tokio::fs::create_dir_all(&self.dir).await?;

        let file_name = upload.generate_file_name();
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, &upload.bytes).await?;

        tracing::info!(
            path = %path.display(),
            size = upload.size(),
            mime = %upload.content_type,
            "Stored upload"
        );

        Ok(StoredFile {
            file_path: format!("{}/{}", self.public_prefix, file_name),
            file_size: upload.size(),
            mime_type: upload.content_type.clone(),
            width: None,
            height: None,
            storage_path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn upload(mime: &str, len: usize) -> Upload {
        Upload {
            file_name: Some("plate.jpg".into()),
            content_type: mime.into(),
            bytes: Bytes::from(vec![7u8; len]),
        }
    }

    #[tokio::test]
    async fn saves_into_created_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested/uploads");
        let store = LocalStore::new(&dir, "/uploads/", 1024);

        let stored = store.save(&upload("image/jpeg", 16)).await.unwrap();

        assert!(stored.file_path.starts_with("/uploads/"));
        assert!(stored.file_path.ends_with(".jpg"));
        assert_eq!(stored.file_size, 16);
        let name = stored.file_path.trim_start_matches("/uploads/");
        let written = std::fs::read(dir.join(name)).unwrap();
        assert_eq!(written.len(), 16);
    }

    #[tokio::test]
    async fn rejected_upload_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("uploads");
        let store = LocalStore::new(&dir, "/uploads", 1024);

        let err = store.save(&upload("text/plain", 16)).await.unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedType { .. }));
        assert!(!dir.exists());

        let err = store.save(&upload("image/png", 2048)).await.unwrap_err();
        assert!(matches!(err, StorageError::TooLarge { .. }));
        assert!(!dir.exists());
    }
}

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::{ImageStore, ImageStoreError};

/// Stores signature images on the local filesystem and serves them from a
/// configured public base URL.
pub struct LocalImageStore {
    base_dir: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    pub fn new(base_dir: PathBuf, public_base_url: String) -> Result<Self, ImageStoreError> {
        std::fs::create_dir_all(&base_dir)
            .map_err(|e| ImageStoreError::UploadFailed(e.to_string()))?;
        Ok(Self {
            base_dir,
            public_base_url,
        })
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn upload(&self, data: &[u8], extension: &str) -> Result<String, ImageStoreError> {
        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.base_dir.join(&filename);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| ImageStoreError::UploadFailed(e.to_string()))?;
        Ok(format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            filename
        ))
    }
}

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
}

/// External image storage. Uploads are best-effort: the completion gate
/// proceeds without a signature URL when an upload fails.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores the image bytes and returns a public URL.
    async fn upload(&self, data: &[u8], extension: &str) -> Result<String, ImageStoreError>;
}

//! Image storage port.

use async_trait::async_trait;

/// Where uploaded post images end up.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `bytes` under `name` and return the public URL.
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<String, StorageError>;
}

/// Image storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O failure: {0}")]
    Io(String),

    #[error("Rejected name: {0}")]
    InvalidName(String),
}

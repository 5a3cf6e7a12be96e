//! Storage abstraction trait

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Upload exceeds the {limit} byte limit")]
    LimitExceeded { limit: u64 },

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked file contents, for streaming responses.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Storage backend for media files, addressed by relative keys.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stream `reader` to `key` until EOF and return the number of bytes written.
    ///
    /// At most `max_bytes` are accepted; one byte more aborts the write with
    /// [`StorageError::LimitExceeded`]. On any failure the partially written file is
    /// removed before returning. An existing file at `key` is never overwritten.
    async fn put_stream(
        &self,
        key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        max_bytes: u64,
    ) -> StorageResult<u64>;

    /// Delete the file at `key`. Deleting a missing file succeeds.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Size in bytes of the file at `key`.
    async fn content_length(&self, key: &str) -> StorageResult<u64>;

    /// Open the file at `key` as a stream of chunks.
    async fn download_stream(&self, key: &str) -> StorageResult<ByteStream>;
}

use crate::traits::{ByteStream, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use futures::StreamExt;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Local filesystem storage rooted at a single directory
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create the root directory if needed and return a storage handle for it.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Map a key to a path below the root. Keys that are absolute, contain `..` or
    /// backslashes, or resolve outside the root are rejected.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let relative = Path::new(key);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidKey(
                "Storage key must be a plain relative path".to_string(),
            ));
        }

        let path = self.base_path.join(relative);

        // Symlinks inside the root could still point elsewhere.
        if let (Ok(base), Ok(canonical)) = (self.base_path.canonicalize(), path.canonicalize()) {
            if canonical.strip_prefix(&base).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn discard_partial(path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove partially written file"
                );
            }
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put_stream(
        &self,
        key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        max_bytes: u64,
    ) -> StorageResult<u64> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    StorageError::AlreadyExists(key.to_string())
                } else {
                    StorageError::UploadFailed(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    ))
                }
            })?;

        // One byte past the ceiling is enough to know the body is too large.
        let mut limited = reader.take(max_bytes.saturating_add(1));
        let result = match tokio::io::copy(&mut limited, &mut file).await {
            Ok(written) if written > max_bytes => {
                Err(StorageError::LimitExceeded { limit: max_bytes })
            }
            Ok(written) => file.sync_all().await.map(|_| written).map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to sync file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) => Err(StorageError::UploadFailed(format!(
                "Failed to write stream to file {}: {}",
                path.display(),
                e
            ))),
        };
        drop(file);

        match result {
            Ok(written) => {
                tracing::info!(
                    path = %path.display(),
                    key = %key,
                    size_bytes = written,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local storage stream upload successful"
                );
                Ok(written)
            }
            Err(err) => {
                Self::discard_partial(&path).await;
                tracing::warn!(
                    key = %key,
                    error = %err,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local storage stream upload aborted"
                );
                Err(err)
            }
        }
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        tracing::info!(
            path = %path.display(),
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn content_length(&self, key: &str) -> StorageResult<u64> {
        let path = self.key_to_path(key)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    async fn download_stream(&self, key: &str) -> StorageResult<ByteStream> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => {
                return Err(StorageError::DownloadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let key = key.to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local storage stream download error"
                );
                StorageError::DownloadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tempfile::tempdir;

    async fn storage_in(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new(dir.path()).await.unwrap()
    }

    #[tokio::test]
    async fn test_put_stream_and_download() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir).await;

        let data = b"stream test data".to_vec();
        let mut reader = std::io::Cursor::new(data.clone());

        let written = storage
            .put_stream("2024/01/02/a.bin", &mut reader, 1024)
            .await
            .unwrap();
        assert_eq!(written, data.len() as u64);
        assert!(dir.path().join("2024/01/02/a.bin").is_file());

        let mut stream = storage.download_stream("2024/01/02/a.bin").await.unwrap();
        let mut downloaded = Vec::new();
        while let Some(chunk) = stream.next().await {
            downloaded.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(downloaded, data);
    }

    #[tokio::test]
    async fn test_body_at_limit_is_accepted() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir).await;

        let mut reader = std::io::Cursor::new(vec![7u8; 64]);
        let written = storage.put_stream("exact.bin", &mut reader, 64).await.unwrap();
        assert_eq!(written, 64);
    }

    #[tokio::test]
    async fn test_oversized_body_is_discarded() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir).await;

        let mut reader = std::io::Cursor::new(vec![0u8; 65]);
        let result = storage.put_stream("big/over.bin", &mut reader, 64).await;

        assert!(matches!(
            result,
            Err(StorageError::LimitExceeded { limit: 64 })
        ));
        assert!(!dir.path().join("big/over.bin").exists());
    }

    #[tokio::test]
    async fn test_existing_file_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir).await;

        let mut first = std::io::Cursor::new(b"first".to_vec());
        storage.put_stream("same.bin", &mut first, 64).await.unwrap();

        let mut second = std::io::Cursor::new(b"second".to_vec());
        let result = storage.put_stream("same.bin", &mut second, 64).await;
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
        assert_eq!(std::fs::read(dir.path().join("same.bin")).unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir).await;

        let result = storage.download_stream("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("./2024/01/x.png").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let mut reader = std::io::Cursor::new(b"x".to_vec());
        let result = storage.put_stream("a\\..\\b", &mut reader, 8).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_ok() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir).await;

        assert!(storage.delete("nonexistent/file.txt").await.is_ok());
    }

    #[tokio::test]
    async fn test_exists_and_content_length() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir).await;

        let mut reader = std::io::Cursor::new(b"test".to_vec());
        storage.put_stream("exists.txt", &mut reader, 64).await.unwrap();

        assert!(storage.exists("exists.txt").await.unwrap());
        assert!(!storage.exists("nonexistent.txt").await.unwrap());
        assert_eq!(storage.content_length("exists.txt").await.unwrap(), 4);
        assert!(matches!(
            storage.content_length("nonexistent.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_download_missing_file() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir).await;

        let result = storage.download_stream("2024/01/01/missing.png").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}

//! Media ingestion: accepting uploads, replacing a record's file, and deleting media.
//!
//! Writes follow a fixed order so that a failure never leaves a record pointing at a
//! missing file. The file lands on disk first, the record is written second, and
//! whatever file is no longer referenced is removed last, best-effort.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::io::AsyncRead;
use vitrine_core::models::{MediaKind, MediaRecord, NewMediaRecord, StoredFile};
use vitrine_core::{AppError, Principal};
use vitrine_db::MediaStore;
use vitrine_storage::{allocate_key, Storage, StorageError};

use crate::cleanup::{discard_file, CleanupOutcome};

const MAX_DISPLAY_NAME_CHARS: usize = 255;
const FALLBACK_DISPLAY_NAME: &str = "upload";

/// An upload as it arrives from the transport layer, before anything touches disk.
pub struct IncomingUpload<'a> {
    pub body: Box<dyn AsyncRead + Send + Unpin + 'a>,
    pub declared_filename: String,
    pub declared_content_type: String,
    /// Size announced by the client, if any. Only used for early rejection; the
    /// byte count actually written is what gets recorded.
    pub declared_size: Option<u64>,
}

/// A failed ingestion, together with what became of the file it had written.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct IngestError {
    pub error: AppError,
    pub cleanup: CleanupOutcome,
}

impl IngestError {
    fn rejected(error: AppError) -> Self {
        Self {
            error,
            cleanup: CleanupOutcome::NotAttempted,
        }
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        err.error
    }
}

/// Result of a successful replace. The old file is gone unless `previous_file` says
/// otherwise.
#[derive(Debug)]
pub struct ReplaceOutcome {
    pub record: MediaRecord,
    pub previous_file: CleanupOutcome,
}

#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted {
        record: MediaRecord,
        file: CleanupOutcome,
    },
    /// Nothing owned by the caller had that id
    Missing,
}

#[derive(Clone)]
pub struct MediaIngestionService {
    store: Arc<dyn MediaStore>,
    storage: Arc<dyn Storage>,
    max_upload_bytes: u64,
}

impl MediaIngestionService {
    pub fn new(store: Arc<dyn MediaStore>, storage: Arc<dyn Storage>, max_upload_bytes: u64) -> Self {
        Self {
            store,
            storage,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Store a new upload for `principal` and create its record.
    ///
    /// The record is appended at the end of the owner's ordering. When the record
    /// cannot be created, the file written for it is removed again.
    #[tracing::instrument(
        skip(self, principal, upload),
        fields(owner_id = principal.user_id, filename = %upload.declared_filename)
    )]
    pub async fn ingest(
        &self,
        principal: &Principal,
        upload: IncomingUpload<'_>,
    ) -> Result<MediaRecord, IngestError> {
        let kind = self.validate(&upload).map_err(IngestError::rejected)?;
        let file = self.write_file(upload, kind).await?;

        let new_record = NewMediaRecord {
            owner_id: principal.user_id,
            file: file.clone(),
        };

        match self.store.create(new_record).await {
            Ok(record) => {
                tracing::info!(
                    media_id = record.id,
                    relative_path = %record.relative_path,
                    size_bytes = record.size_bytes,
                    sort_rank = record.sort_rank,
                    "Media uploaded"
                );
                Ok(record)
            }
            Err(error) => {
                tracing::error!(
                    error = %error,
                    relative_path = %file.relative_path,
                    "Failed to create media record, removing stored file"
                );
                let cleanup = discard_file(self.storage.as_ref(), &file.relative_path).await;
                Err(IngestError { error, cleanup })
            }
        }
    }

    /// Swap the file behind an existing record, keeping its id, owner and rank.
    ///
    /// The new file is written before the record changes. If the record update fails
    /// the new file is removed and the record keeps pointing at the old one.
    #[tracing::instrument(skip(self, principal, upload), fields(owner_id = principal.user_id, media_id = id))]
    pub async fn replace(
        &self,
        principal: &Principal,
        id: i64,
        upload: IncomingUpload<'_>,
    ) -> Result<ReplaceOutcome, IngestError> {
        let existing = self
            .store
            .get_by_id(id, principal.user_id)
            .await
            .map_err(IngestError::rejected)?
            .ok_or_else(|| IngestError::rejected(media_not_found()))?;

        let kind = self.validate(&upload).map_err(IngestError::rejected)?;
        let file = self.write_file(upload, kind).await?;
        let candidate = existing.clone().with_file(file.clone());

        let updated = match self.store.replace(&candidate).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                let cleanup = discard_file(self.storage.as_ref(), &file.relative_path).await;
                return Err(IngestError {
                    error: media_not_found(),
                    cleanup,
                });
            }
            Err(error) => {
                tracing::error!(
                    error = %error,
                    relative_path = %file.relative_path,
                    "Failed to update media record, removing replacement file"
                );
                let cleanup = discard_file(self.storage.as_ref(), &file.relative_path).await;
                return Err(IngestError { error, cleanup });
            }
        };

        let previous_file = discard_file(self.storage.as_ref(), &existing.relative_path).await;

        tracing::info!(
            previous_path = %existing.relative_path,
            relative_path = %updated.relative_path,
            size_bytes = updated.size_bytes,
            "Media file replaced"
        );

        Ok(ReplaceOutcome {
            record: updated,
            previous_file,
        })
    }

    /// Delete the caller's media record and then its file.
    ///
    /// Deleting an id the caller does not own, or one already deleted, yields
    /// [`DeleteOutcome::Missing`] and touches nothing.
    #[tracing::instrument(skip(self, principal), fields(owner_id = principal.user_id, media_id = id))]
    pub async fn delete(&self, principal: &Principal, id: i64) -> Result<DeleteOutcome, AppError> {
        let Some(existing) = self.store.get_by_id(id, principal.user_id).await? else {
            return Ok(DeleteOutcome::Missing);
        };

        if !self.store.delete(id, principal.user_id).await? {
            return Ok(DeleteOutcome::Missing);
        }

        let file = discard_file(self.storage.as_ref(), &existing.relative_path).await;
        tracing::info!(relative_path = %existing.relative_path, "Media deleted");

        Ok(DeleteOutcome::Deleted {
            record: existing,
            file,
        })
    }

    fn validate(&self, upload: &IncomingUpload<'_>) -> Result<MediaKind, AppError> {
        let kind = MediaKind::from_content_type(&upload.declared_content_type).ok_or_else(|| {
            AppError::UnsupportedMediaType(format!(
                "Unsupported file type '{}': only images and videos are allowed",
                upload.declared_content_type
            ))
        })?;

        if let Some(size) = upload.declared_size {
            if size > self.max_upload_bytes {
                return Err(self.too_large());
            }
        }

        Ok(kind)
    }

    async fn write_file(
        &self,
        upload: IncomingUpload<'_>,
        kind: MediaKind,
    ) -> Result<StoredFile, IngestError> {
        let key = allocate_key(&upload.declared_filename, Utc::now());
        let mut body = upload.body;

        let written = self
            .storage
            .put_stream(&key.relative_path, &mut *body, self.max_upload_bytes)
            .await
            .map_err(|e| IngestError::rejected(self.map_storage_error(e)))?;

        if written == 0 {
            let cleanup = discard_file(self.storage.as_ref(), &key.relative_path).await;
            return Err(IngestError {
                error: AppError::InvalidInput("Uploaded file is empty".to_string()),
                cleanup,
            });
        }

        let size_bytes = i64::try_from(written).map_err(|_| {
            IngestError::rejected(AppError::Internal(format!(
                "Stored file size {} does not fit the record",
                written
            )))
        })?;

        tracing::debug!(relative_path = %key.relative_path, bytes = written, "Stored upload on disk");

        Ok(StoredFile {
            stored_name: key.stored_name,
            original_name: display_name(&upload.declared_filename),
            relative_path: key.relative_path,
            size_bytes,
            content_type: upload.declared_content_type,
            kind,
        })
    }

    fn map_storage_error(&self, error: StorageError) -> AppError {
        match error {
            StorageError::LimitExceeded { .. } => self.too_large(),
            other => AppError::Storage(other.to_string()),
        }
    }

    fn too_large(&self) -> AppError {
        AppError::PayloadTooLarge(format!(
            "File exceeds the maximum upload size of {} bytes",
            self.max_upload_bytes
        ))
    }
}

fn media_not_found() -> AppError {
    AppError::NotFound("Media not found".to_string())
}

/// Last path segment of the client-supplied name, trimmed and bounded.
fn display_name(declared: &str) -> String {
    let base = declared
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(declared)
        .trim();

    if base.is_empty() {
        return FALLBACK_DISPLAY_NAME.to_string();
    }

    base.chars().take(MAX_DISPLAY_NAME_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_strips_directories() {
        assert_eq!(display_name("holiday.jpg"), "holiday.jpg");
        assert_eq!(display_name("../../etc/passwd.png"), "passwd.png");
        assert_eq!(display_name("C:\\Users\\me\\clip.mp4"), "clip.mp4");
    }

    #[test]
    fn test_display_name_fallback_and_bound() {
        assert_eq!(display_name(""), FALLBACK_DISPLAY_NAME);
        assert_eq!(display_name("photos/"), FALLBACK_DISPLAY_NAME);

        let long = "a".repeat(400);
        assert_eq!(display_name(&long).chars().count(), MAX_DISPLAY_NAME_CHARS);
    }
}

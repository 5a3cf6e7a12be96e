//! Best-effort removal of files whose record never materialized or no longer exists.

use vitrine_storage::Storage;

/// What happened to a file that had to be removed as a side effect.
///
/// A failed removal never changes the result of the operation that triggered it; the
/// file is simply left behind as an orphan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// No file needed removing
    NotAttempted,
    Removed,
    /// Removal failed; the file may remain on disk
    Failed(String),
}

impl CleanupOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, CleanupOutcome::Failed(_))
    }
}

/// Remove `key` from storage, logging instead of propagating a failure.
pub async fn discard_file(storage: &dyn Storage, key: &str) -> CleanupOutcome {
    match storage.delete(key).await {
        Ok(()) => CleanupOutcome::Removed,
        Err(e) => {
            tracing::warn!(
                key = %key,
                error = %e,
                "Failed to remove file, leaving it orphaned on disk"
            );
            CleanupOutcome::Failed(e.to_string())
        }
    }
}

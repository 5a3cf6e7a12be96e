//! Owner-defined ordering of media records.

use std::sync::Arc;

use vitrine_core::models::MediaRecord;
use vitrine_core::{AppError, Principal};
use vitrine_db::MediaStore;

#[derive(Clone)]
pub struct SortOrderReconciler {
    store: Arc<dyn MediaStore>,
}

impl SortOrderReconciler {
    pub fn new(store: Arc<dyn MediaStore>) -> Self {
        Self { store }
    }

    /// Give the record at position `i` of `ordered_ids` rank `i + 1`.
    ///
    /// All ranks change together or none do. Ids the caller does not own are skipped
    /// without error, and records missing from the list keep their rank.
    #[tracing::instrument(skip(self, principal, ordered_ids), fields(owner_id = principal.user_id, count = ordered_ids.len()))]
    pub async fn reorder(&self, principal: &Principal, ordered_ids: &[i64]) -> Result<(), AppError> {
        if ordered_ids.is_empty() {
            return Err(AppError::InvalidInput(
                "media_ids must contain at least one id".to_string(),
            ));
        }

        let updated = self
            .store
            .set_ranks_batch(principal.user_id, ordered_ids)
            .await?;

        tracing::info!(requested = ordered_ids.len(), updated, "Media order updated");
        Ok(())
    }

    /// Set the rank of a single record. `None` leaves the record unchanged.
    #[tracing::instrument(skip(self, principal), fields(owner_id = principal.user_id))]
    pub async fn set_rank(
        &self,
        principal: &Principal,
        id: i64,
        rank: Option<i32>,
    ) -> Result<MediaRecord, AppError> {
        let existing = self
            .store
            .get_by_id(id, principal.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;

        let Some(sort_rank) = rank else {
            return Ok(existing);
        };

        let candidate = MediaRecord {
            sort_rank,
            ..existing
        };

        self.store
            .update_rank(&candidate)
            .await?
            .ok_or_else(|| AppError::NotFound("Media not found".to_string()))
    }
}

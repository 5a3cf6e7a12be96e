//! Paginated, filtered and ordered retrieval of media records.

use std::sync::Arc;

use vitrine_core::models::{ListScope, MediaRecord, PageRequest, PageResult};
use vitrine_core::{AppError, Principal};
use vitrine_db::MediaStore;

#[derive(Clone)]
pub struct ListingEngine {
    store: Arc<dyn MediaStore>,
}

impl ListingEngine {
    pub fn new(store: Arc<dyn MediaStore>) -> Self {
        Self { store }
    }

    /// One page of records in `scope`.
    ///
    /// `request` has already been coerced to valid bounds; a page past the end comes
    /// back empty with the true total.
    #[tracing::instrument(skip(self), fields(order = request.order.as_str()))]
    pub async fn list(&self, scope: ListScope, request: PageRequest) -> Result<PageResult, AppError> {
        let (data, total) = self.store.list(scope, &request).await?;
        Ok(PageResult::new(data, total, &request))
    }

    pub async fn list_for(
        &self,
        principal: &Principal,
        request: PageRequest,
    ) -> Result<PageResult, AppError> {
        self.list(ListScope::Owner(principal.user_id), request).await
    }

    pub async fn list_public(&self, request: PageRequest) -> Result<PageResult, AppError> {
        self.list(ListScope::Public, request).await
    }

    /// A single record owned by `principal`. Other owners' records are reported as missing.
    pub async fn get(&self, principal: &Principal, id: i64) -> Result<MediaRecord, AppError> {
        self.store
            .get_by_id(id, principal.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Media not found".to_string()))
    }

    /// The live record stored at `relative_path`, for serving its file publicly.
    pub async fn resolve_public_file(&self, relative_path: &str) -> Result<MediaRecord, AppError> {
        self.store
            .get_public_by_path(relative_path)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }
}

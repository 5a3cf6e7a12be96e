//! Application state shared by every handler.

use crate::auth::JwtService;
use std::sync::Arc;
use vitrine_core::Config;
use vitrine_db::{MediaStore, UserStore};
use vitrine_services::{ListingEngine, MediaIngestionService, SortOrderReconciler};
use vitrine_storage::Storage;

/// Media services plus the store and storage they were built on, for health probes and
/// file streaming.
#[derive(Clone)]
pub struct MediaState {
    pub ingestion: MediaIngestionService,
    pub listing: ListingEngine,
    pub reconciler: SortOrderReconciler,
    pub store: Arc<dyn MediaStore>,
    pub storage: Arc<dyn Storage>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub media: MediaState,
    pub users: Arc<dyn UserStore>,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn MediaStore>,
        users: Arc<dyn UserStore>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let media = MediaState {
            ingestion: MediaIngestionService::new(
                store.clone(),
                storage.clone(),
                config.max_upload_bytes(),
            ),
            listing: ListingEngine::new(store.clone()),
            reconciler: SortOrderReconciler::new(store.clone()),
            store,
            storage,
        };
        let jwt = Arc::new(JwtService::new(config.jwt_secret(), config.jwt_expiry_hours()));

        Self {
            config,
            media,
            users,
            jwt,
        }
    }
}

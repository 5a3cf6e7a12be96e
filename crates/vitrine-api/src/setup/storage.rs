//! Storage setup and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use vitrine_core::Config;
use vitrine_storage::{LocalStorage, Storage};

/// Open the upload root, creating it if needed.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let upload_path = config.upload_path();
    tracing::info!(upload_path = %upload_path.display(), "Initializing local storage...");

    let storage = LocalStorage::new(upload_path)
        .await
        .with_context(|| format!("Failed to open upload directory {}", upload_path.display()))?;

    Ok(Arc::new(storage))
}

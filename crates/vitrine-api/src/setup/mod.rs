//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vitrine_core::Config;
use vitrine_db::{MediaRepository, UserRepository};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.environment())?;

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(MediaRepository::new(pool.clone())),
        Arc::new(UserRepository::new(pool)),
        storage,
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

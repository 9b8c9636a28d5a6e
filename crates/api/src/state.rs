use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::metadata::MetadataService;
use crate::storage::FileStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: careoffice_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Cached lookup catalog.
    pub metadata: Arc<MetadataService>,
    /// Uploaded document file store.
    pub storage: Arc<FileStore>,
}

impl AppState {
    /// Build state and its services from a pool and loaded configuration.
    pub fn new(pool: careoffice_db::DbPool, config: ServerConfig) -> Self {
        let metadata = MetadataService::new(Duration::from_secs(config.metadata_cache_ttl_secs));
        let storage = FileStore::new(config.upload_dir.clone(), config.max_upload_bytes);
        Self {
            pool,
            config: Arc::new(config),
            metadata: Arc::new(metadata),
            storage: Arc::new(storage),
        }
    }
}

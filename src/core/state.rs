use crate::core::{AppError, AppResult, Config};
use crate::db::FloorStorage;

/// Server state — shared handles for all request handlers.
///
/// Cheap to clone: the storage wraps an `Arc<Database>` internally.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub storage: FloorStorage,
}

impl ServerState {
    /// Open the record store under the configured working directory.
    pub fn initialize(config: &Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| AppError::Internal(format!("Failed to create work dir: {}", e)))?;
        let storage = FloorStorage::open(config.db_path())?;
        tracing::info!(path = %config.db_path().display(), "Record store opened");
        Ok(Self {
            config: config.clone(),
            storage,
        })
    }

    /// In-memory state for tests.
    pub fn in_memory(config: Config) -> AppResult<Self> {
        let storage = FloorStorage::open_in_memory()?;
        Ok(Self { config, storage })
    }
}

//! Record store layer — models and redb-backed storage.

pub mod models;
pub mod storage;

pub use storage::{FloorStorage, StorageError, StorageResult};

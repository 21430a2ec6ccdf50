//! Record store.
//!
//! Flat-file persistence for accounts and sleep records: JSONL is the
//! source of truth, loaded into memory at startup and rewritten on
//! mutation. All record access is owner-scoped.

mod jsonl;
mod store;

pub use jsonl::{EntityType, JsonlReader, JsonlWriter};
pub use store::RecordStore;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("email already registered: {0}")]
    DuplicateEmail(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// File path for the given entity type.
    pub fn entity_path(&self, entity: EntityType) -> PathBuf {
        self.data_dir.join(entity.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(
            config.entity_path(EntityType::User),
            PathBuf::from("/data/users.jsonl")
        );
        assert_eq!(
            config.entity_path(EntityType::SleepRecord),
            PathBuf::from("/data/sleep_records.jsonl")
        );
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }
}

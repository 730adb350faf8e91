//! Persistence of canonical players and run snapshots

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use crate::model::{CanonicalPlayer, Resource};
use async_trait::async_trait;
use thiserror::Error;

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Canonical player storage
///
/// `save` is an upsert keyed by player id. Implementations keep the
/// original `created_at` and never replace a mention already recorded for
/// a source.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<CanonicalPlayer>, StoreError>;

    async fn save(&self, player: &CanonicalPlayer) -> Result<(), StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}

/// Archive of per-run snapshots
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn save(&self, resource: &Resource) -> Result<(), StoreError>;

    /// Snapshots for one source, oldest first
    async fn resources_for_source(&self, source_id: &str) -> Result<Vec<Resource>, StoreError>;
}

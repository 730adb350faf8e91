//! Per-run ranking snapshots

use super::player::PlayerStub;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordered snapshot of the stubs one source run resolved
///
/// Immutable once captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    id: Uuid,
    source_id: String,
    captured_at: DateTime<Utc>,
    ranked_players: Vec<PlayerStub>,
}

impl Resource {
    pub fn capture(source_id: impl Into<String>, ranked_players: Vec<PlayerStub>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_id: source_id.into(),
            captured_at: Utc::now(),
            ranked_players,
        }
    }

    /// Rebuild a snapshot loaded from storage
    pub fn restore(
        id: Uuid,
        source_id: String,
        captured_at: DateTime<Utc>,
        ranked_players: Vec<PlayerStub>,
    ) -> Self {
        Self {
            id,
            source_id,
            captured_at,
            ranked_players,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn ranked_players(&self) -> &[PlayerStub] {
        &self.ranked_players
    }
}

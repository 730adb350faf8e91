//! In-memory persistence
//!
//! Same save semantics as the SQLite store: upsert by id, `created_at`
//! kept, existing mentions never replaced.

use super::{PlayerStore, ResourceStore, StoreError};
use crate::model::{CanonicalPlayer, Resource};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    players: RwLock<HashMap<String, CanonicalPlayer>>,
    resources: RwLock<Vec<Resource>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All players, ordered by id
    pub async fn players(&self) -> Vec<CanonicalPlayer> {
        let mut players: Vec<CanonicalPlayer> = self.players.read().await.values().cloned().collect();
        players.sort_by(|a, b| a.id.cmp(&b.id));
        players
    }

    /// All snapshots, in save order
    pub async fn resources(&self) -> Vec<Resource> {
        self.resources.read().await.clone()
    }
}

#[async_trait]
impl PlayerStore for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<CanonicalPlayer>, StoreError> {
        Ok(self.players.read().await.get(id).cloned())
    }

    async fn save(&self, player: &CanonicalPlayer) -> Result<(), StoreError> {
        let mut players = self.players.write().await;
        match players.get_mut(&player.id) {
            Some(existing) => {
                existing.profile = player.profile.clone();
                existing.updated_at = player.updated_at;
                for mention in player.mentions.values() {
                    existing.add_mention_if_absent(mention);
                }
            }
            None => {
                players.insert(player.id.clone(), player.clone());
            }
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.players.read().await.len())
    }
}

#[async_trait]
impl ResourceStore for InMemoryStore {
    async fn save(&self, resource: &Resource) -> Result<(), StoreError> {
        self.resources.write().await.push(resource.clone());
        Ok(())
    }

    async fn resources_for_source(&self, source_id: &str) -> Result<Vec<Resource>, StoreError> {
        Ok(self
            .resources
            .read()
            .await
            .iter()
            .filter(|r| r.source_id() == source_id)
            .cloned()
            .collect())
    }
}

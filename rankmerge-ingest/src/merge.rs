//! Merge and persist engine
//!
//! Reconciles an accepted directory candidate with persisted state:
//! - unseen external id: the stub adopts the candidate and a new canonical
//!   player is saved with the stub's mentions
//! - known external id: the stub's mention is added only if the source has
//!   none yet, descriptive fields are overwritten from the candidate, and
//!   the merged record is copied back onto the stub
//!
//! Lookup and save for one external id run under a per-id lock, so sources
//! processed concurrently never race on the same record.

use crate::model::{CanonicalPlayer, ExternalCandidate, PlayerStub};
use crate::store::{PlayerStore, StoreError};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What reconciliation did to the canonical record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKind {
    Created,
    Updated,
    /// Record already matched; nothing written
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub player: CanonicalPlayer,
    pub kind: MergeKind,
}

pub struct MergeEngine {
    store: Arc<dyn PlayerStore>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl MergeEngine {
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Reconcile one accepted candidate for `stub` as listed by `source_id`
    ///
    /// # Errors
    /// Any storage failure; a missing record is not an error.
    pub async fn reconcile(
        &self,
        stub: &mut PlayerStub,
        candidate: &ExternalCandidate,
        source_id: &str,
    ) -> Result<MergeOutcome, StoreError> {
        let id = candidate.external_id.as_str();
        let lock = self.lock_for(id).await;

        let outcome = {
            let _guard = lock.lock().await;
            self.reconcile_locked(stub, candidate, source_id).await
        };

        self.release(id, lock).await;
        outcome
    }

    async fn reconcile_locked(
        &self,
        stub: &mut PlayerStub,
        candidate: &ExternalCandidate,
        source_id: &str,
    ) -> Result<MergeOutcome, StoreError> {
        let now = Utc::now();

        match self.store.find_by_id(&candidate.external_id).await? {
            Some(mut player) => {
                let mut changed = false;
                if let Some(mention) = stub.mentions.get(source_id) {
                    changed |= player.add_mention_if_absent(mention);
                }
                changed |= player.apply_profile(&candidate.profile);

                let kind = if changed {
                    player.updated_at = now;
                    self.store.save(&player).await?;
                    MergeKind::Updated
                } else {
                    MergeKind::Unchanged
                };

                stub.absorb(&player);
                tracing::debug!(player_id = %player.id, source = %source_id, kind = ?kind, "Merged into existing player");
                Ok(MergeOutcome { player, kind })
            }
            None => {
                stub.adopt(candidate);
                let player = CanonicalPlayer::from_candidate(candidate, stub.mentions.clone(), now);
                self.store.save(&player).await?;

                tracing::debug!(player_id = %player.id, source = %source_id, "Created player");
                Ok(MergeOutcome {
                    player,
                    kind: MergeKind::Created,
                })
            }
        }
    }

    async fn lock_for(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the lock entry once no other task holds or waits on it
    async fn release(&self, id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        drop(lock);
        if locks.get(id).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlayerProfile;
    use crate::store::InMemoryStore;

    fn stub(name: &str, source_id: &str, rank: u32) -> PlayerStub {
        let mut stub = PlayerStub::seeded(PlayerProfile::from_full_name(name).unwrap(), source_id);
        stub.rank_in(source_id, rank);
        stub
    }

    fn candidate(id: &str, name: &str, team: &str) -> ExternalCandidate {
        ExternalCandidate::new(
            id,
            PlayerProfile::from_full_name(name).unwrap().with_pro_team(team),
        )
    }

    #[tokio::test]
    async fn test_creates_unseen_player() {
        let store = Arc::new(InMemoryStore::new());
        let engine = MergeEngine::new(store.clone());

        let mut s = stub("Mike Trout", "2018-ESPN", 1);
        let outcome = engine
            .reconcile(&mut s, &candidate("1044", "Michael Trout", "LAA"), "2018-ESPN")
            .await
            .unwrap();

        assert_eq!(outcome.kind, MergeKind::Created);
        assert_eq!(outcome.player.id, "1044");
        assert_eq!(outcome.player.mentions["2018-ESPN"].rank, 1);
        assert_eq!(s.external_id.as_deref(), Some("1044"));
        assert_eq!(s.profile.full_name, "Michael Trout");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_existing_player_gains_mention_and_fields() {
        let store = Arc::new(InMemoryStore::new());
        let engine = MergeEngine::new(store.clone());

        let mut first = stub("Mike Trout", "2018-ESPN", 1);
        engine
            .reconcile(&mut first, &candidate("1044", "Mike Trout", "LAA"), "2018-ESPN")
            .await
            .unwrap();

        let mut second = stub("Mike Trout", "MLB-2016", 3);
        let outcome = engine
            .reconcile(&mut second, &candidate("1044", "Mike Trout", "PHI"), "MLB-2016")
            .await
            .unwrap();

        assert_eq!(outcome.kind, MergeKind::Updated);
        assert_eq!(outcome.player.mentions.len(), 2);
        assert_eq!(outcome.player.profile.pro_team.as_deref(), Some("PHI"));
        assert_eq!(second.mentions, outcome.player.mentions);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_existing_mention_not_overwritten() {
        let store = Arc::new(InMemoryStore::new());
        let engine = MergeEngine::new(store.clone());
        let c = candidate("1044", "Mike Trout", "LAA");

        engine
            .reconcile(&mut stub("Mike Trout", "2018-ESPN", 1), &c, "2018-ESPN")
            .await
            .unwrap();
        let outcome = engine
            .reconcile(&mut stub("Mike Trout", "2018-ESPN", 9), &c, "2018-ESPN")
            .await
            .unwrap();

        assert_eq!(outcome.kind, MergeKind::Unchanged);
        assert_eq!(outcome.player.mentions["2018-ESPN"].rank, 1);
    }

    #[tokio::test]
    async fn test_concurrent_reconcile_single_record() {
        let store = Arc::new(InMemoryStore::new());
        let engine = Arc::new(MergeEngine::new(store.clone()));

        let tasks: Vec<_> = (0..8u32)
            .map(|i| {
                let engine = engine.clone();
                tokio::spawn(async move {
                    let source = format!("source-{}", i);
                    let mut s = stub("Mike Trout", &source, i + 1);
                    engine
                        .reconcile(&mut s, &candidate("1044", "Mike Trout", "LAA"), &source)
                        .await
                        .unwrap()
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let player = store.find_by_id("1044").await.unwrap().unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(player.mentions.len(), 8);
        assert!(engine.locks.lock().await.is_empty());
    }
}

//! SQLite persistence
//!
//! Tables are created by `rankmerge_common::db::init_tables`.

use super::{PlayerStore, ResourceStore, StoreError};
use crate::model::{CanonicalPlayer, Mention, MentionMap, PlayerProfile, Position, Resource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_mentions(&self, player_id: &str) -> Result<MentionMap, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT source_id, rank
            FROM player_mentions
            WHERE player_id = ?
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let source_id: String = row.get("source_id");
                let rank: i32 = row.get("rank");
                (source_id.clone(), Mention { source_id, rank })
            })
            .collect())
    }
}

#[async_trait]
impl PlayerStore for SqliteStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<CanonicalPlayer>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, full_name, first_name, last_name, position, eligible_positions,
                   pro_team, owned_by_team_id, is_free_agent, created_at, updated_at
            FROM players
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let position: Option<Position> = match row.get::<Option<String>, _>("position") {
            Some(code) => Some(code.parse().map_err(|reason| StoreError::Corrupt {
                id: id.to_string(),
                reason,
            })?),
            None => None,
        };
        let eligible_positions: Vec<String> =
            serde_json::from_str(&row.get::<String, _>("eligible_positions"))?;

        let profile = PlayerProfile {
            full_name: row.get("full_name"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            position,
            eligible_positions,
            pro_team: row.get("pro_team"),
            owned_by_team_id: row.get("owned_by_team_id"),
            is_free_agent: row.get("is_free_agent"),
        };
        let created_at: DateTime<Utc> = row.get("created_at");
        let updated_at: DateTime<Utc> = row.get("updated_at");

        Ok(Some(CanonicalPlayer {
            id: row.get("id"),
            profile,
            mentions: self.load_mentions(id).await?,
            created_at,
            updated_at,
        }))
    }

    async fn save(&self, player: &CanonicalPlayer) -> Result<(), StoreError> {
        let eligible_positions = serde_json::to_string(&player.profile.eligible_positions)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO players (
                id, full_name, first_name, last_name, position, eligible_positions,
                pro_team, owned_by_team_id, is_free_agent, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                full_name = excluded.full_name,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                position = excluded.position,
                eligible_positions = excluded.eligible_positions,
                pro_team = excluded.pro_team,
                owned_by_team_id = excluded.owned_by_team_id,
                is_free_agent = excluded.is_free_agent,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&player.id)
        .bind(&player.profile.full_name)
        .bind(&player.profile.first_name)
        .bind(&player.profile.last_name)
        .bind(player.profile.position.map(|p| p.code()))
        .bind(&eligible_positions)
        .bind(&player.profile.pro_team)
        .bind(&player.profile.owned_by_team_id)
        .bind(player.profile.is_free_agent)
        .bind(player.created_at)
        .bind(player.updated_at)
        .execute(&mut *tx)
        .await?;

        for mention in player.mentions.values() {
            sqlx::query(
                r#"
                INSERT INTO player_mentions (player_id, source_id, rank, recorded_at)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(player_id, source_id) DO NOTHING
                "#,
            )
            .bind(&player.id)
            .bind(&mention.source_id)
            .bind(mention.rank)
            .bind(player.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

#[async_trait]
impl ResourceStore for SqliteStore {
    async fn save(&self, resource: &Resource) -> Result<(), StoreError> {
        let ranked_players = serde_json::to_string(resource.ranked_players())?;

        sqlx::query(
            r#"
            INSERT INTO resources (id, source_id, captured_at, ranked_players)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(resource.id().to_string())
        .bind(resource.source_id())
        .bind(resource.captured_at())
        .bind(&ranked_players)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn resources_for_source(&self, source_id: &str) -> Result<Vec<Resource>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, source_id, captured_at, ranked_players
            FROM resources
            WHERE source_id = ?
            ORDER BY captured_at
            "#,
        )
        .bind(source_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<Resource, StoreError> {
                let id_str: String = row.get("id");
                let id = Uuid::parse_str(&id_str).map_err(|e| StoreError::Corrupt {
                    id: id_str.clone(),
                    reason: e.to_string(),
                })?;
                let ranked_players = serde_json::from_str(&row.get::<String, _>("ranked_players"))?;
                Ok(Resource::restore(
                    id,
                    row.get("source_id"),
                    row.get("captured_at"),
                    ranked_players,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExternalCandidate, PlayerStub};
    use rankmerge_common::db::init_memory_pool;

    async fn store() -> SqliteStore {
        SqliteStore::new(init_memory_pool().await.unwrap())
    }

    fn player(id: &str, source_id: &str, rank: u32) -> CanonicalPlayer {
        let candidate = ExternalCandidate::new(
            id,
            PlayerProfile::new("Mookie Betts", "Betts")
                .unwrap()
                .with_first_name("Mookie")
                .with_position(Position::RightField)
                .with_eligible_positions(["RF", "2B"])
                .with_pro_team("LAD")
                .with_owner("8"),
        );
        let mut mentions = MentionMap::new();
        mentions.insert(source_id.to_string(), Mention::ranked(source_id, rank));
        CanonicalPlayer::from_candidate(&candidate, mentions, Utc::now())
    }

    #[tokio::test]
    async fn test_save_and_load_player() {
        let store = store().await;
        let saved = player("2207", "2018-ESPN", 5);
        PlayerStore::save(&store, &saved).await.unwrap();

        let loaded = store.find_by_id("2207").await.unwrap().unwrap();
        assert_eq!(loaded.profile, saved.profile);
        assert_eq!(loaded.mentions, saved.mentions);
        assert_eq!(loaded.created_at.timestamp(), saved.created_at.timestamp());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_missing_player() {
        let store = store().await;
        assert!(store.find_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_keeps_created_at_and_first_mention() {
        let store = store().await;
        let first = player("2207", "2018-ESPN", 5);
        PlayerStore::save(&store, &first).await.unwrap();

        let mut second = player("2207", "2018-ESPN", 40);
        second.created_at = first.created_at + chrono::Duration::days(1);
        second.updated_at = second.created_at;
        second.profile.pro_team = Some("BOS".to_string());
        second
            .mentions
            .insert("MLB-2016".to_string(), Mention::ranked("MLB-2016", 2));
        PlayerStore::save(&store, &second).await.unwrap();

        let loaded = store.find_by_id("2207").await.unwrap().unwrap();
        assert_eq!(loaded.profile.pro_team.as_deref(), Some("BOS"));
        assert_eq!(loaded.mentions["2018-ESPN"].rank, 5);
        assert_eq!(loaded.mentions["MLB-2016"].rank, 2);
        assert_eq!(loaded.created_at.timestamp(), first.created_at.timestamp());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_resource_round_trip() {
        let store = store().await;
        let mut stub = PlayerStub::seeded(PlayerProfile::from_full_name("Mookie Betts").unwrap(), "s");
        stub.rank_in("s", 1);
        stub.external_id = Some("2207".to_string());

        let resource = Resource::capture("s", vec![stub]);
        ResourceStore::save(&store, &resource).await.unwrap();

        let loaded = store.resources_for_source("s").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id(), resource.id());
        assert_eq!(loaded[0].ranked_players(), resource.ranked_players());
        assert!(store.resources_for_source("other").await.unwrap().is_empty());
    }
}

//! Per-run search cache
//!
//! Memoizes successful searches by query text, trimmed but otherwise exact. The cache is
//! cleared at the start of each run, so results never outlive the run that
//! fetched them. Failed searches are not cached.

use super::{DirectoryError, PlayerDirectory};
use crate::model::ExternalCandidate;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

pub struct CachedDirectory<D> {
    inner: D,
    entries: Mutex<HashMap<String, Vec<ExternalCandidate>>>,
}

impl<D: PlayerDirectory> CachedDirectory<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl<D: PlayerDirectory> PlayerDirectory for CachedDirectory<D> {
    async fn begin_run(&self) -> Result<(), DirectoryError> {
        self.entries.lock().await.clear();
        self.inner.begin_run().await
    }

    async fn search(&self, query: &str) -> Result<Vec<ExternalCandidate>, DirectoryError> {
        let key = query.trim().to_string();
        if let Some(hit) = self.entries.lock().await.get(&key) {
            tracing::debug!(query = %query, "Player directory cache hit");
            return Ok(hit.clone());
        }

        let candidates = self.inner.search(query).await?;
        self.entries.lock().await.insert(key, candidates.clone());
        Ok(candidates)
    }
}

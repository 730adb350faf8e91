//! Shared test fixtures
#![allow(dead_code)]

pub mod log_capture;

use async_trait::async_trait;
use rankmerge_ingest::directory::{DirectoryError, PlayerDirectory};
use rankmerge_ingest::matching::CandidateFilter;
use rankmerge_ingest::merge::MergeEngine;
use rankmerge_ingest::model::{CanonicalPlayer, ExternalCandidate, PlayerProfile};
use rankmerge_ingest::parsers::{CsvRankingParser, ParsedSource};
use rankmerge_ingest::reporter::RunReporter;
use rankmerge_ingest::resolver::IdentityResolver;
use rankmerge_ingest::store::{InMemoryStore, PlayerStore, ResourceStore, StoreError};
use rankmerge_ingest::IngestPipeline;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Directory answering from a fixed query → candidates table
///
/// Unknown queries return no candidates. Queries marked as failing return
/// `DirectoryError::Unavailable`. Every call is recorded.
#[derive(Default)]
pub struct ScriptedDirectory {
    results: HashMap<String, Vec<ExternalCandidate>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
    runs: AtomicUsize,
}

impl ScriptedDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, query: &str, candidates: Vec<ExternalCandidate>) -> Self {
        self.results.insert(query.to_string(), candidates);
        self
    }

    pub fn fail_on(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlayerDirectory for ScriptedDirectory {
    async fn begin_run(&self) -> Result<(), DirectoryError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<ExternalCandidate>, DirectoryError> {
        self.calls.lock().unwrap().push(query.to_string());
        if self.failing.contains(query) {
            return Err(DirectoryError::unavailable(query, "connection refused"));
        }
        Ok(self.results.get(query).cloned().unwrap_or_default())
    }
}

/// Player store whose writes always fail
#[derive(Default)]
pub struct FailingStore {
    inner: InMemoryStore,
}

#[async_trait]
impl PlayerStore for FailingStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<CanonicalPlayer>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn save(&self, _player: &CanonicalPlayer) -> Result<(), StoreError> {
        Err(StoreError::Backend("disk full".to_string()))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.inner.count().await
    }
}

pub fn candidate(id: &str, name: &str) -> ExternalCandidate {
    ExternalCandidate::new(id, PlayerProfile::from_full_name(name).unwrap())
}

pub fn owned_candidate(id: &str, name: &str, team_id: &str) -> ExternalCandidate {
    ExternalCandidate::new(
        id,
        PlayerProfile::from_full_name(name).unwrap().with_owner(team_id),
    )
}

pub fn free_agent(id: &str, name: &str) -> ExternalCandidate {
    ExternalCandidate::new(
        id,
        PlayerProfile::from_full_name(name).unwrap().as_free_agent(),
    )
}

/// Parse a ranking list given as one `name` per entry
pub fn source(source_id: &str, names: &[&str]) -> ParsedSource {
    let content: String = names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{},{},,\n", i + 1, name))
        .collect();
    CsvRankingParser::parse_str(source_id, &content).unwrap()
}

pub fn pipeline(
    directory: Arc<dyn PlayerDirectory>,
    players: Arc<dyn PlayerStore>,
    resources: Arc<dyn ResourceStore>,
    home_roster_id: Option<&str>,
) -> IngestPipeline {
    IngestPipeline::new(
        directory,
        IdentityResolver::new(CandidateFilter::default()),
        MergeEngine::new(players),
        RunReporter::new(home_roster_id.map(str::to_string)),
        resources,
    )
}

//! Source ingestion pipeline
//!
//! Each source is processed strictly in rank order: resolve the stub,
//! reconcile every accepted candidate, report. Directory failures and
//! unresolved stubs are logged and skipped; a persistence failure ends the
//! source's run without saving its snapshot.

use crate::directory::PlayerDirectory;
use crate::error::IngestResult;
use crate::merge::{MergeEngine, MergeKind};
use crate::model::Resource;
use crate::parsers::ParsedSource;
use crate::reporter::{Notice, RunReporter};
use crate::resolver::{IdentityResolver, Resolution};
use crate::store::ResourceStore;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Counts for one source run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub source_id: String,
    pub stubs: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub directory_failures: usize,
    pub mismatches: usize,
    pub created: usize,
    pub updated: usize,
    pub notices: Vec<Notice>,
}

impl RunSummary {
    fn new(source_id: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            ..Default::default()
        }
    }
}

pub struct IngestPipeline {
    directory: Arc<dyn PlayerDirectory>,
    resolver: IdentityResolver,
    merge: MergeEngine,
    reporter: RunReporter,
    resources: Arc<dyn ResourceStore>,
}

impl IngestPipeline {
    pub fn new(
        directory: Arc<dyn PlayerDirectory>,
        resolver: IdentityResolver,
        merge: MergeEngine,
        reporter: RunReporter,
        resources: Arc<dyn ResourceStore>,
    ) -> Self {
        Self {
            directory,
            resolver,
            merge,
            reporter,
            resources,
        }
    }

    /// Ingest one parsed source
    ///
    /// # Errors
    /// Persistence failures, or failing to start the directory session.
    pub async fn run_source(&self, source: ParsedSource) -> IngestResult<RunSummary> {
        let started = Instant::now();
        let source_id = source.source_id;
        let mut summary = RunSummary::new(&source_id);
        summary.stubs = source.stubs.len();

        tracing::info!(source = %source_id, players = summary.stubs, "Starting source run");
        self.directory.begin_run().await?;

        let mut ranked_players = Vec::new();
        let mut rank: u32 = 0;

        for mut stub in source.stubs {
            rank += 1;
            if !stub.mentions.get(&source_id).is_some_and(|m| m.is_ranked()) {
                stub.rank_in(&source_id, rank);
            }

            let resolution = match self.resolver.resolve(self.directory.as_ref(), &stub).await {
                Ok(resolution) => resolution,
                Err(e) => {
                    tracing::warn!(source = %source_id, rank, player = %stub, error = %e, "Directory lookup failed, skipping player");
                    summary.directory_failures += 1;
                    continue;
                }
            };
            summary.mismatches += resolution.mismatch_count();

            let accepted = match resolution {
                Resolution::Accepted { accepted, .. } => accepted,
                Resolution::Unresolved(reason) => {
                    tracing::warn!(source = %source_id, rank, player = %stub, reason = %reason, "Player not resolved");
                    summary.unresolved += 1;
                    continue;
                }
            };

            let parsed = stub.clone();
            for candidate in &accepted {
                let mut working = parsed.clone();
                let outcome = self.merge.reconcile(&mut working, candidate, &source_id).await?;
                match outcome.kind {
                    MergeKind::Created => summary.created += 1,
                    MergeKind::Updated => summary.updated += 1,
                    MergeKind::Unchanged => {}
                }
                if let Some(notice) = self.reporter.inspect(&working, &source_id, rank) {
                    summary.notices.push(notice);
                }
                stub = working;
            }
            summary.resolved += 1;
            ranked_players.push(stub);
        }

        let resource = Resource::capture(&source_id, ranked_players);
        self.resources.save(&resource).await?;

        tracing::info!(
            source = %source_id,
            stubs = summary.stubs,
            resolved = summary.resolved,
            unresolved = summary.unresolved,
            directory_failures = summary.directory_failures,
            mismatches = summary.mismatches,
            created = summary.created,
            updated = summary.updated,
            notices = summary.notices.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Source run complete"
        );
        Ok(summary)
    }

    /// Ingest several sources, one after another or concurrently
    ///
    /// Each source gets its own result; one failing source does not stop
    /// the others.
    pub async fn run_all(
        &self,
        sources: Vec<ParsedSource>,
        parallel: bool,
    ) -> Vec<IngestResult<RunSummary>> {
        if parallel {
            return join_all(sources.into_iter().map(|source| self.run_source(source))).await;
        }

        let mut results = Vec::with_capacity(sources.len());
        for source in sources {
            results.push(self.run_source(source).await);
        }
        results
    }
}

//! rankmerge-ingest - ranking list ingestion
//!
//! Parses ranking lists, resolves each listed player against the player
//! directory, and merges the results into the canonical player database.

use anyhow::{Context, Result};
use clap::Parser;
use rankmerge_common::config::{
    load_config, resolve_access_token, resolve_database_path, resolve_home_roster_id,
};
use rankmerge_common::db::init_database_pool;
use rankmerge_common::logging::init_tracing;
use rankmerge_ingest::directory::{
    CachedDirectory, HttpDirectoryClient, PlayerDirectory, StaticTokenAuth,
};
use rankmerge_ingest::matching::{CandidateFilter, NameMatcher};
use rankmerge_ingest::merge::MergeEngine;
use rankmerge_ingest::parsers::{CsvRankingParser, ParsedSource, RankingParser};
use rankmerge_ingest::reporter::RunReporter;
use rankmerge_ingest::resolver::IdentityResolver;
use rankmerge_ingest::store::SqliteStore;
use rankmerge_ingest::IngestPipeline;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Command-line arguments for rankmerge-ingest
#[derive(Parser, Debug)]
#[command(name = "rankmerge-ingest")]
#[command(about = "Merge player ranking lists into canonical player records")]
#[command(version)]
struct Args {
    /// Config file (default: RANKMERGE_CONFIG, then the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite database path
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Fantasy team id whose players are reported as future players
    #[arg(long)]
    home_roster: Option<String>,

    /// Process sources concurrently
    #[arg(long)]
    parallel: bool,

    /// Ranking list files (replace the sources listed in the config file)
    #[arg(value_name = "SOURCE_FILES")]
    sources: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config.logging).context("Failed to initialize logging")?;

    info!("Starting rankmerge-ingest {}", env!("CARGO_PKG_VERSION"));

    let parsers: Vec<CsvRankingParser> = if args.sources.is_empty() {
        config
            .sources
            .iter()
            .map(|s| CsvRankingParser::new(&s.path, s.id.clone()))
            .collect()
    } else {
        args.sources
            .iter()
            .map(|path| CsvRankingParser::new(path, None))
            .collect()
    };
    if parsers.is_empty() {
        anyhow::bail!("No ranking sources given on the command line or in the config file");
    }

    let db_path = resolve_database_path(args.database.as_deref(), &config);
    info!("Database: {}", db_path.display());
    let pool = init_database_pool(&db_path)
        .await
        .context("Failed to open database")?;
    let store = Arc::new(SqliteStore::new(pool));

    let token = resolve_access_token(&config.directory)?;
    let client = HttpDirectoryClient::new(config.directory.clone(), Arc::new(StaticTokenAuth::new(token)))?;
    let directory: Arc<dyn PlayerDirectory> = if config.directory.cache_queries {
        Arc::new(CachedDirectory::new(client))
    } else {
        Arc::new(client)
    };

    let home_roster_id = resolve_home_roster_id(args.home_roster.as_deref(), &config);
    match &home_roster_id {
        Some(id) => info!("Home roster: {}", id),
        None => info!("No home roster configured, future player notices disabled"),
    }

    let matcher = NameMatcher::new(config.matching.given_name_similarity);
    let pipeline = IngestPipeline::new(
        directory,
        IdentityResolver::new(CandidateFilter::new(matcher)),
        MergeEngine::new(store.clone()),
        RunReporter::new(home_roster_id),
        store,
    );

    let total = parsers.len();
    let mut failed = 0usize;
    let mut sources: Vec<ParsedSource> = Vec::with_capacity(total);
    for parser in &parsers {
        match parser.parse() {
            Ok(source) => sources.push(source),
            Err(e) => {
                error!(source = %parser.source_id(), error = %e, "Failed to parse ranking list");
                failed += 1;
            }
        }
    }

    for result in pipeline.run_all(sources, args.parallel).await {
        match result {
            Ok(summary) => {
                for notice in &summary.notices {
                    println!("{}", notice);
                }
            }
            Err(e) => {
                error!(error = %e, "Source run failed");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} sources failed", failed, total);
    }

    info!("All {} sources ingested", total);
    Ok(())
}

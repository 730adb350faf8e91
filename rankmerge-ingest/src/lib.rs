//! # rankmerge ingest
//!
//! Resolves the players named in ranking lists against an external player
//! directory and merges them into deduplicated canonical records that
//! accumulate one mention per ranking source.
//!
//! ## Architecture
//! - `parsers`: ranking lists → ordered player stubs
//! - `directory`: name search against the player directory
//! - `matching`: normalization, name equality, candidate filter
//! - `resolver`: relaxation cascade per stub
//! - `merge`: reconcile accepted candidates with storage
//! - `reporter`: free-agent and future-player notices
//! - `store`: SQLite and in-memory persistence
//! - `pipeline`: per-source orchestration

pub mod directory;
pub mod error;
pub mod matching;
pub mod merge;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod reporter;
pub mod resolver;
pub mod store;

pub use error::{IngestError, IngestResult};
pub use pipeline::{IngestPipeline, RunSummary};

//! Ranking list parsers

pub mod csv_list;

pub use csv_list::CsvRankingParser;

use crate::model::{PlayerStub, ValidationError};
use std::path::PathBuf;
use thiserror::Error;

/// Ranking list parse errors
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{source_id} line {line}: {reason}")]
    Malformed {
        source_id: String,
        line: usize,
        reason: String,
    },

    #[error("{source_id} line {line}: {error}")]
    Invalid {
        source_id: String,
        line: usize,
        #[source]
        error: ValidationError,
    },
}

/// One source's stubs in rank order
///
/// Every stub carries exactly one mention, for `source_id`, ranked by its
/// 1-based position in the list.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSource {
    pub source_id: String,
    pub stubs: Vec<PlayerStub>,
}

/// Produces stubs from one ranking source
pub trait RankingParser: Send + Sync {
    fn source_id(&self) -> &str;

    fn parse(&self) -> Result<ParsedSource, ParseError>;
}

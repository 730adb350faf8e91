//! Ingest error type

use crate::directory::DirectoryError;
use crate::parsers::ParseError;
use crate::store::StoreError;
use thiserror::Error;

pub type IngestResult<T> = std::result::Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Fatal to the source run in progress
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

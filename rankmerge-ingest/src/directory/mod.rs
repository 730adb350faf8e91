//! Player directory access
//!
//! The directory is the only source of player identities. It is reachable
//! only through name search; each search is a single round trip with no
//! retry.

pub mod auth;
pub mod cache;
pub mod client;

pub use auth::{AuthProvider, StaticTokenAuth};
pub use cache::CachedDirectory;
pub use client::HttpDirectoryClient;

use crate::model::ExternalCandidate;
use async_trait::async_trait;
use thiserror::Error;

/// Player directory errors
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// Network failure, non-success status, or undecodable response
    #[error("Player directory unavailable for query '{query}': {reason}")]
    Unavailable { query: String, reason: String },

    /// No auth token could be obtained
    #[error("Player directory authentication failed: {0}")]
    Auth(String),
}

impl DirectoryError {
    pub fn unavailable(query: &str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            query: query.to_string(),
            reason: reason.into(),
        }
    }
}

/// Name search against the player directory
#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    /// Search players by free-text name
    ///
    /// An empty result is a valid outcome, not an error.
    async fn search(&self, query: &str) -> Result<Vec<ExternalCandidate>, DirectoryError>;

    /// Called once before each source run
    async fn begin_run(&self) -> Result<(), DirectoryError> {
        Ok(())
    }
}

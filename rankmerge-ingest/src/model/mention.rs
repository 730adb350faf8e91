//! Source mentions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Rank of a mention that has been seeded but not yet ranked
pub const UNRANKED: i32 = -1;

/// Mentions keyed by source id
pub type MentionMap = BTreeMap<String, Mention>;

/// A ranking source listed a player at a given position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub source_id: String,
    /// 1-based rank, or [`UNRANKED`]
    pub rank: i32,
}

impl Mention {
    /// Mention for a source before the player's rank is known
    pub fn seeded(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            rank: UNRANKED,
        }
    }

    /// Mention at a known 1-based rank
    pub fn ranked(source_id: impl Into<String>, rank: u32) -> Self {
        Self {
            source_id: source_id.into(),
            rank: i32::try_from(rank).unwrap_or(i32::MAX),
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.rank >= 1
    }
}

impl fmt::Display for Mention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ranked() {
            write!(f, "#{} by {}", self.rank, self.source_id)
        } else {
            write!(f, "unranked by {}", self.source_id)
        }
    }
}

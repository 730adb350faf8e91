//! Run reporter
//!
//! Flags resolved players worth a look: free agents, and players owned by
//! the configured home roster ("future players"). Reporting never affects
//! resolution or persistence.

use crate::model::PlayerStub;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    FreeAgent,
    FuturePlayer,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FreeAgent => "free agent",
            Self::FuturePlayer => "future player",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub source_id: String,
    /// 1-based rank in the source
    pub rank: u32,
    pub player_name: String,
    pub external_id: Option<String>,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is a {} (#{} in {})",
            self.player_name, self.kind, self.rank, self.source_id
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunReporter {
    home_roster_id: Option<String>,
}

impl RunReporter {
    pub fn new(home_roster_id: Option<String>) -> Self {
        Self { home_roster_id }
    }

    /// Inspect a merged stub; returns the notice emitted, if any
    pub fn inspect(&self, stub: &PlayerStub, source_id: &str, rank: u32) -> Option<Notice> {
        let kind = if stub.profile.is_free_agent {
            NoticeKind::FreeAgent
        } else if self.home_roster_id.is_some()
            && stub.profile.owned_by_team_id.as_deref() == self.home_roster_id.as_deref()
        {
            NoticeKind::FuturePlayer
        } else {
            return None;
        };

        let notice = Notice {
            kind,
            source_id: source_id.to_string(),
            rank,
            player_name: stub.profile.full_name.clone(),
            external_id: stub.external_id.clone(),
        };

        tracing::info!(
            kind = %notice.kind,
            player = %notice.player_name,
            rank = notice.rank,
            source = %notice.source_id,
            "{}",
            notice
        );
        Some(notice)
    }
}

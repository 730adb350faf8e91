//! Candidate filter
//!
//! Decides which directory candidates a stub refers to:
//! - a single raw candidate is accepted as is
//! - otherwise only relaxed-equal candidates are considered; of those, the
//!   strict-equal ones are accepted, or the only one if there is just one
//! - remaining relaxed-equal candidates are mismatches

use super::equality::NameMatcher;
use crate::model::{ExternalCandidate, PlayerStub};

/// Result of filtering one query's candidates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub accepted: Vec<ExternalCandidate>,
    /// Plausible but unaccepted candidates
    pub mismatches: Vec<ExternalCandidate>,
}

impl FilterOutcome {
    pub fn is_resolved(&self) -> bool {
        !self.accepted.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateFilter {
    matcher: NameMatcher,
}

impl CandidateFilter {
    pub fn new(matcher: NameMatcher) -> Self {
        Self { matcher }
    }

    pub fn apply(&self, stub: &PlayerStub, candidates: Vec<ExternalCandidate>) -> FilterOutcome {
        if candidates.len() == 1 {
            return FilterOutcome {
                accepted: candidates,
                mismatches: Vec::new(),
            };
        }

        let name = &stub.profile.full_name;
        let relaxed: Vec<ExternalCandidate> = candidates
            .into_iter()
            .filter(|c| self.matcher.relaxed_eq(name, &c.profile.full_name))
            .collect();

        let only_one = relaxed.len() == 1;
        let (accepted, mismatches): (Vec<_>, Vec<_>) = relaxed
            .into_iter()
            .partition(|c| only_one || self.matcher.strict_eq(name, &c.profile.full_name));

        for candidate in &mismatches {
            tracing::debug!(
                stub = %stub,
                candidate = %candidate.profile.full_name,
                external_id = %candidate.external_id,
                "Candidate mismatch"
            );
        }

        FilterOutcome {
            accepted,
            mismatches,
        }
    }
}

//! Identity resolver
//!
//! Resolves a stub to directory candidates through a relaxation cascade:
//!
//! 1. full name
//! 2. last name, if the full name found nothing
//! 3. first token of the full name, if the last name found nothing
//!
//! The first step that returns anything is filtered and ends the cascade,
//! whether or not the filter accepts a candidate. Every step issues its own
//! request; blank or repeated query text is skipped without a call.

use crate::directory::{DirectoryError, PlayerDirectory};
use crate::matching::{CandidateFilter, FilterOutcome};
use crate::model::{ExternalCandidate, PlayerStub};
use std::fmt;

/// Cascade step a query was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStep {
    FullName,
    LastName,
    FirstToken,
}

impl fmt::Display for QueryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FullName => "full name",
            Self::LastName => "last name",
            Self::FirstToken => "first token",
        })
    }
}

/// Why a stub could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// Every query step came back empty
    NoCandidates,
    /// A step returned candidates but none were accepted
    FilteredOut {
        step: QueryStep,
        mismatches: Vec<ExternalCandidate>,
    },
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCandidates => f.write_str("no directory candidates"),
            Self::FilteredOut { step, mismatches } => write!(
                f,
                "no acceptable candidate by {} ({} mismatches)",
                step,
                mismatches.len()
            ),
        }
    }
}

/// Outcome of resolving one stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Accepted {
        step: QueryStep,
        accepted: Vec<ExternalCandidate>,
        mismatches: Vec<ExternalCandidate>,
    },
    Unresolved(UnresolvedReason),
}

impl Resolution {
    pub fn mismatch_count(&self) -> usize {
        match self {
            Self::Accepted { mismatches, .. } => mismatches.len(),
            Self::Unresolved(UnresolvedReason::FilteredOut { mismatches, .. }) => mismatches.len(),
            Self::Unresolved(UnresolvedReason::NoCandidates) => 0,
        }
    }
}

/// Query text for each cascade step, in order
pub fn relaxation_queries(stub: &PlayerStub) -> Vec<(QueryStep, String)> {
    let steps = [
        (QueryStep::FullName, stub.profile.full_name.trim()),
        (QueryStep::LastName, stub.profile.last_name.trim()),
        (QueryStep::FirstToken, stub.profile.first_token()),
    ];

    let mut queries: Vec<(QueryStep, String)> = Vec::with_capacity(steps.len());
    for (step, text) in steps {
        if text.is_empty() || queries.iter().any(|(_, q)| q == text) {
            continue;
        }
        queries.push((step, text.to_string()));
    }
    queries
}

#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    filter: CandidateFilter,
}

impl IdentityResolver {
    pub fn new(filter: CandidateFilter) -> Self {
        Self { filter }
    }

    /// Resolve one stub against the directory
    ///
    /// # Errors
    /// A directory failure at any step aborts the cascade for this stub.
    pub async fn resolve(
        &self,
        directory: &dyn PlayerDirectory,
        stub: &PlayerStub,
    ) -> Result<Resolution, DirectoryError> {
        for (step, query) in relaxation_queries(stub) {
            let candidates = directory.search(&query).await?;
            if candidates.is_empty() {
                tracing::debug!(stub = %stub, step = %step, query = %query, "No candidates, relaxing query");
                continue;
            }

            let FilterOutcome {
                accepted,
                mismatches,
            } = self.filter.apply(stub, candidates);

            if accepted.is_empty() {
                return Ok(Resolution::Unresolved(UnresolvedReason::FilteredOut {
                    step,
                    mismatches,
                }));
            }

            tracing::debug!(
                stub = %stub,
                step = %step,
                accepted = accepted.len(),
                "Resolved stub"
            );
            return Ok(Resolution::Accepted {
                step,
                accepted,
                mismatches,
            });
        }

        Ok(Resolution::Unresolved(UnresolvedReason::NoCandidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlayerProfile;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeDirectory {
        results: HashMap<String, Vec<ExternalCandidate>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeDirectory {
        fn with(mut self, query: &str, names: &[(&str, &str)]) -> Self {
            let candidates = names
                .iter()
                .map(|(id, name)| {
                    ExternalCandidate::new(*id, PlayerProfile::from_full_name(*name).unwrap())
                })
                .collect();
            self.results.insert(query.to_string(), candidates);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PlayerDirectory for FakeDirectory {
        async fn search(&self, query: &str) -> Result<Vec<ExternalCandidate>, DirectoryError> {
            self.calls.lock().unwrap().push(query.to_string());
            if query == "offline" {
                return Err(DirectoryError::unavailable(query, "connection refused"));
            }
            Ok(self.results.get(query).cloned().unwrap_or_default())
        }
    }

    fn stub(full_name: &str, last_name: &str) -> PlayerStub {
        PlayerStub::seeded(PlayerProfile::new(full_name, last_name).unwrap(), "test")
    }

    #[test]
    fn test_relaxation_queries() {
        let queries = relaxation_queries(&stub(" Mike Trout ", "Trout"));
        assert_eq!(
            queries,
            vec![
                (QueryStep::FullName, "Mike Trout".to_string()),
                (QueryStep::LastName, "Trout".to_string()),
                (QueryStep::FirstToken, "Mike".to_string()),
            ]
        );
    }

    #[test]
    fn test_relaxation_queries_skip_repeats() {
        let queries = relaxation_queries(&stub("Ichiro", "Ichiro"));
        assert_eq!(queries, vec![(QueryStep::FullName, "Ichiro".to_string())]);
    }

    #[tokio::test]
    async fn test_full_name_hit_stops_cascade() {
        let directory = FakeDirectory::default().with("Mike Trout", &[("1", "Mike Trout")]);
        let resolution = IdentityResolver::default()
            .resolve(&directory, &stub("Mike Trout", "Trout"))
            .await
            .unwrap();

        assert!(matches!(resolution, Resolution::Accepted { step: QueryStep::FullName, .. }));
        assert_eq!(directory.calls(), vec!["Mike Trout"]);
    }

    #[tokio::test]
    async fn test_cascade_to_last_name() {
        let directory = FakeDirectory::default().with("Smith", &[("2", "Jon Smythe")]);
        let resolution = IdentityResolver::default()
            .resolve(&directory, &stub("Jon Smith", "Smith"))
            .await
            .unwrap();

        match resolution {
            Resolution::Accepted { step, accepted, .. } => {
                assert_eq!(step, QueryStep::LastName);
                assert_eq!(accepted[0].external_id, "2");
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
        assert_eq!(directory.calls(), vec!["Jon Smith", "Smith"]);
    }

    #[tokio::test]
    async fn test_filtered_out_stops_cascade() {
        let directory = FakeDirectory::default().with(
            "Will Smith",
            &[("1", "William Smith"), ("2", "Willie Smith")],
        );
        let resolution = IdentityResolver::default()
            .resolve(&directory, &stub("Will Smith", "Smith"))
            .await
            .unwrap();

        assert!(matches!(
            resolution,
            Resolution::Unresolved(UnresolvedReason::FilteredOut { step: QueryStep::FullName, .. })
        ));
        assert_eq!(resolution.mismatch_count(), 2);
        assert_eq!(directory.calls(), vec!["Will Smith"]);
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let directory = FakeDirectory::default();
        let resolution = IdentityResolver::default()
            .resolve(&directory, &stub("Nobody Known", "Known"))
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::Unresolved(UnresolvedReason::NoCandidates));
        assert_eq!(directory.calls(), vec!["Nobody Known", "Known", "Nobody"]);
    }

    #[tokio::test]
    async fn test_blank_last_name_step_skipped() {
        let mut s = stub("Nobody Known", "Known");
        s.profile.last_name = "   ".to_string();
        let directory = FakeDirectory::default();
        IdentityResolver::default().resolve(&directory, &s).await.unwrap();
        assert_eq!(directory.calls(), vec!["Nobody Known", "Nobody"]);
    }

    #[tokio::test]
    async fn test_directory_failure_aborts() {
        let directory = FakeDirectory::default();
        let result = IdentityResolver::default()
            .resolve(&directory, &stub("offline", "offline"))
            .await;
        assert!(matches!(result, Err(DirectoryError::Unavailable { .. })));
        assert_eq!(directory.calls(), vec!["offline"]);
    }
}

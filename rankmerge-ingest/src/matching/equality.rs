//! Strict and relaxed name equality

use super::normalize::{normalize_name, relaxed_tokens};
use strsim::jaro_winkler;

/// Default Jaro-Winkler threshold for given names
pub const DEFAULT_GIVEN_NAME_SIMILARITY: f64 = 0.85;

/// Compares player names
///
/// Strict equality: normalized full names are identical.
///
/// Relaxed equality: with generational suffixes dropped, the surnames (last
/// tokens) are identical and the given names (first tokens) are at least
/// `given_name_similarity` alike. A bare initial (`J`, or `J.D.` which
/// normalizes to `j d`) matches any given name with that initial. Full given
/// names never match on the initial alone. Single-token names compare whole.
#[derive(Debug, Clone, Copy)]
pub struct NameMatcher {
    given_name_similarity: f64,
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_GIVEN_NAME_SIMILARITY)
    }
}

impl NameMatcher {
    pub fn new(given_name_similarity: f64) -> Self {
        Self {
            given_name_similarity: given_name_similarity.clamp(0.0, 1.0),
        }
    }

    pub fn strict_eq(&self, a: &str, b: &str) -> bool {
        let a = normalize_name(a);
        !a.is_empty() && a == normalize_name(b)
    }

    pub fn relaxed_eq(&self, a: &str, b: &str) -> bool {
        let a = relaxed_tokens(a);
        let b = relaxed_tokens(b);

        if a.is_empty() || b.is_empty() {
            return false;
        }
        if a.len() < 2 || b.len() < 2 {
            return a.concat() == b.concat();
        }

        if a.last() != b.last() {
            return false;
        }

        let (given_a, given_b) = (&a[0], &b[0]);
        if is_initial(given_a) || is_initial(given_b) {
            return given_a.chars().next() == given_b.chars().next();
        }
        jaro_winkler(given_a, given_b) >= self.given_name_similarity
    }
}

fn is_initial(token: &str) -> bool {
    token.chars().count() == 1
}

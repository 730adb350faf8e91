//! Player name matching
//!
//! Normalization, strict/relaxed name equality, and the candidate filter
//! that narrows directory results to the player a stub refers to.

pub mod equality;
pub mod filter;
pub mod normalize;

pub use equality::NameMatcher;
pub use filter::{CandidateFilter, FilterOutcome};
pub use normalize::{normalize_name, relaxed_tokens};

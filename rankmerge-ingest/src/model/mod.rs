//! Player identity data model
//!
//! Stubs come from ranking-list parsers, candidates from the player
//! directory, and canonical players are what gets persisted.

pub mod mention;
pub mod player;
pub mod position;
pub mod resource;

pub use mention::{Mention, MentionMap, UNRANKED};
pub use player::{CanonicalPlayer, ExternalCandidate, PlayerProfile, PlayerStub, ValidationError};
pub use position::Position;
pub use resource::Resource;

//! Player stubs, directory candidates, and canonical players

use super::mention::{Mention, MentionMap};
use super::position::Position;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Player construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Player full name is empty")]
    EmptyFullName,

    #[error("Player last name is empty (full name: {0})")]
    EmptyLastName(String),
}

/// Descriptive fields shared by stubs, candidates, and canonical players
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub full_name: String,
    pub first_name: Option<String>,
    pub last_name: String,
    pub position: Option<Position>,
    #[serde(default)]
    pub eligible_positions: Vec<String>,
    pub pro_team: Option<String>,
    pub owned_by_team_id: Option<String>,
    #[serde(default)]
    pub is_free_agent: bool,
}

impl PlayerProfile {
    /// Profile with the required names; names are trimmed and must not be empty
    pub fn new(
        full_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let full_name = full_name.into().trim().to_string();
        if full_name.is_empty() {
            return Err(ValidationError::EmptyFullName);
        }
        let last_name = last_name.into().trim().to_string();
        if last_name.is_empty() {
            return Err(ValidationError::EmptyLastName(full_name));
        }

        Ok(Self {
            full_name,
            first_name: None,
            last_name,
            position: None,
            eligible_positions: Vec::new(),
            pro_team: None,
            owned_by_team_id: None,
            is_free_agent: false,
        })
    }

    /// Profile whose last name is the final whitespace token of the full name
    pub fn from_full_name(full_name: impl Into<String>) -> Result<Self, ValidationError> {
        let full_name = full_name.into();
        let last_name = full_name.split_whitespace().last().unwrap_or("").to_string();
        Self::new(full_name, last_name)
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        let first_name = first_name.into().trim().to_string();
        self.first_name = (!first_name.is_empty()).then_some(first_name);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_eligible_positions<I, S>(mut self, positions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.eligible_positions = positions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pro_team(mut self, pro_team: impl Into<String>) -> Self {
        self.pro_team = Some(pro_team.into());
        self
    }

    pub fn with_owner(mut self, owned_by_team_id: impl Into<String>) -> Self {
        self.owned_by_team_id = Some(owned_by_team_id.into());
        self.is_free_agent = false;
        self
    }

    pub fn as_free_agent(mut self) -> Self {
        self.owned_by_team_id = None;
        self.is_free_agent = true;
        self
    }

    /// First whitespace token of the full name
    pub fn first_token(&self) -> &str {
        self.full_name.split_whitespace().next().unwrap_or("")
    }
}

/// A player as listed by one ranking source, for the duration of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStub {
    #[serde(flatten)]
    pub profile: PlayerProfile,
    pub mentions: MentionMap,
    /// Set once the stub has been resolved against the directory
    pub external_id: Option<String>,
}

impl PlayerStub {
    /// New stub carrying one unranked mention for `source_id`
    pub fn seeded(profile: PlayerProfile, source_id: impl Into<String>) -> Self {
        let mention = Mention::seeded(source_id);
        let mut mentions = MentionMap::new();
        mentions.insert(mention.source_id.clone(), mention);

        Self {
            profile,
            mentions,
            external_id: None,
        }
    }

    /// Record this stub's 1-based rank in `source_id`
    pub fn rank_in(&mut self, source_id: &str, rank: u32) {
        self.mentions
            .insert(source_id.to_string(), Mention::ranked(source_id, rank));
    }

    /// Rank recorded for `source_id`, if any
    pub fn rank_for(&self, source_id: &str) -> Option<i32> {
        self.mentions.get(source_id).map(|m| m.rank)
    }

    /// Take the identity and descriptive fields of a directory candidate
    pub fn adopt(&mut self, candidate: &ExternalCandidate) {
        self.profile = candidate.profile.clone();
        self.external_id = Some(candidate.external_id.clone());
    }

    /// Replace this stub's state with a persisted canonical record
    pub fn absorb(&mut self, player: &CanonicalPlayer) {
        self.profile = player.profile.clone();
        self.mentions = player.mentions.clone();
        self.external_id = Some(player.id.clone());
    }
}

impl fmt::Display for PlayerStub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.profile.full_name)?;
        match (&self.profile.pro_team, &self.profile.position) {
            (Some(team), Some(position)) => write!(f, " ({team}, {position})"),
            (Some(team), None) => write!(f, " ({team})"),
            (None, Some(position)) => write!(f, " ({position})"),
            (None, None) => Ok(()),
        }
    }
}

/// One result from a player directory search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCandidate {
    /// Directory identifier, the dedup key for canonical players
    pub external_id: String,
    #[serde(flatten)]
    pub profile: PlayerProfile,
}

impl ExternalCandidate {
    pub fn new(external_id: impl Into<String>, profile: PlayerProfile) -> Self {
        Self {
            external_id: external_id.into(),
            profile,
        }
    }
}

/// The persisted, deduplicated record of a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPlayer {
    /// External id of the candidate this record was created from
    pub id: String,
    pub profile: PlayerProfile,
    pub mentions: MentionMap,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CanonicalPlayer {
    /// New record from a stub that has adopted a candidate
    pub fn from_candidate(
        candidate: &ExternalCandidate,
        mentions: MentionMap,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: candidate.external_id.clone(),
            profile: candidate.profile.clone(),
            mentions,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a mention unless one for the same source is already recorded
    ///
    /// Returns whether the mention was added.
    pub fn add_mention_if_absent(&mut self, mention: &Mention) -> bool {
        if self.mentions.contains_key(&mention.source_id) {
            return false;
        }
        self.mentions
            .insert(mention.source_id.clone(), mention.clone());
        true
    }

    /// Overwrite descriptive fields; returns whether anything changed
    pub fn apply_profile(&mut self, profile: &PlayerProfile) -> bool {
        if self.profile == *profile {
            return false;
        }
        self.profile = profile.clone();
        true
    }
}

//! Baseball positions and club codes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fielding or pitching position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Position {
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    Shortstop,
    LeftField,
    CenterField,
    RightField,
    Outfield,
    DesignatedHitter,
    StartingPitcher,
    ReliefPitcher,
    Pitcher,
    Utility,
}

impl Position {
    /// Standard abbreviation
    pub fn code(self) -> &'static str {
        match self {
            Self::Catcher => "C",
            Self::FirstBase => "1B",
            Self::SecondBase => "2B",
            Self::ThirdBase => "3B",
            Self::Shortstop => "SS",
            Self::LeftField => "LF",
            Self::CenterField => "CF",
            Self::RightField => "RF",
            Self::Outfield => "OF",
            Self::DesignatedHitter => "DH",
            Self::StartingPitcher => "SP",
            Self::ReliefPitcher => "RP",
            Self::Pitcher => "P",
            Self::Utility => "U",
        }
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Ok(match code.as_str() {
            "C" => Self::Catcher,
            "1B" => Self::FirstBase,
            "2B" => Self::SecondBase,
            "3B" => Self::ThirdBase,
            "SS" => Self::Shortstop,
            "LF" => Self::LeftField,
            "CF" => Self::CenterField,
            "RF" => Self::RightField,
            "OF" => Self::Outfield,
            "DH" => Self::DesignatedHitter,
            "SP" => Self::StartingPitcher,
            "RP" => Self::ReliefPitcher,
            "P" | "RHP" | "LHP" => Self::Pitcher,
            "U" | "UT" | "UTIL" => Self::Utility,
            _ => return Err(format!("unknown position: {}", s.trim())),
        })
    }
}

impl TryFrom<String> for Position {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Position> for String {
    fn from(value: Position) -> Self {
        value.code().to_string()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Current major league club abbreviations
const MLB_TEAMS: &[&str] = &[
    "ARI", "ATL", "BAL", "BOS", "CHC", "CWS", "CIN", "CLE", "COL", "DET", "HOU", "KC", "LAA",
    "LAD", "MIA", "MIL", "MIN", "NYM", "NYY", "OAK", "PHI", "PIT", "SD", "SF", "SEA", "STL",
    "TB", "TEX", "TOR", "WAS",
];

/// Common alternate spellings of club codes
const MLB_TEAM_ALIASES: &[(&str, &str)] = &[
    ("AZ", "ARI"),
    ("CHW", "CWS"),
    ("KCR", "KC"),
    ("SDP", "SD"),
    ("SFG", "SF"),
    ("TBR", "TB"),
    ("WSH", "WAS"),
    ("WSN", "WAS"),
];

/// Canonical club code for an abbreviation, if it names a known club
pub fn mlb_team_code(team: &str) -> Option<&'static str> {
    let code = team.trim().to_ascii_uppercase();
    if let Some(known) = MLB_TEAMS.iter().copied().find(|t| *t == code) {
        return Some(known);
    }
    MLB_TEAM_ALIASES
        .iter()
        .find(|(alias, _)| *alias == code)
        .map(|(_, canonical)| *canonical)
}

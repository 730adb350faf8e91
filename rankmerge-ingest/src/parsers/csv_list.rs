//! Comma-separated ranking lists
//!
//! One player per line: `rank,name,positions,pro_team`, where `positions`
//! is `/`-separated (`SS/3B`). The rank column is informational; a player's
//! rank is its position among the non-blank records. Fields may be quoted
//! (`"Acuna, Ronald"`). An optional header record starting with `rank` is
//! skipped.

use super::{ParseError, ParsedSource, RankingParser};
use crate::model::position::mlb_team_code;
use crate::model::{PlayerProfile, PlayerStub, Position};
use std::path::{Path, PathBuf};

/// Team column value for unsigned players
const FREE_AGENT_TEAM: &str = "FA";

pub struct CsvRankingParser {
    path: PathBuf,
    source_id: String,
}

impl CsvRankingParser {
    /// Parser for `path`; the source id defaults to the file stem
    pub fn new(path: impl Into<PathBuf>, source_id: Option<String>) -> Self {
        let path = path.into();
        let source_id = source_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| source_id_from_path(&path));
        Self { path, source_id }
    }

    /// Parse list content already in memory
    pub fn parse_str(source_id: &str, content: &str) -> Result<ParsedSource, ParseError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut stubs = Vec::new();
        let mut record = csv::StringRecord::new();
        let mut last_line = 0;

        loop {
            match reader.read_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    let line = e
                        .position()
                        .map(|p| line_number(p.line()))
                        .unwrap_or(last_line + 1);
                    return Err(ParseError::Malformed {
                        source_id: source_id.to_string(),
                        line,
                        reason: e.to_string(),
                    });
                }
            }

            let line_no = record
                .position()
                .map(|p| line_number(p.line()))
                .unwrap_or(last_line + 1);
            last_line = line_no;

            if record.iter().all(str::is_empty) || is_header(&record) {
                continue;
            }

            let mut stub = parse_record(source_id, line_no, &record)?;
            let rank = u32::try_from(stubs.len() + 1).unwrap_or(u32::MAX);
            stub.rank_in(source_id, rank);
            stubs.push(stub);
        }

        tracing::debug!(source = %source_id, players = stubs.len(), "Parsed ranking list");
        Ok(ParsedSource {
            source_id: source_id.to_string(),
            stubs,
        })
    }
}

impl RankingParser for CsvRankingParser {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn parse(&self) -> Result<ParsedSource, ParseError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| ParseError::Io {
            path: self.path.clone(),
            source,
        })?;
        Self::parse_str(&self.source_id, &content)
    }
}

/// `2018-ESPN.csv` → `2018-ESPN`
pub fn source_id_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn line_number(line: u64) -> usize {
    usize::try_from(line).unwrap_or(usize::MAX)
}

fn is_header(record: &csv::StringRecord) -> bool {
    record
        .get(0)
        .is_some_and(|first| first.eq_ignore_ascii_case("rank"))
}

fn parse_record(
    source_id: &str,
    line_no: usize,
    record: &csv::StringRecord,
) -> Result<PlayerStub, ParseError> {
    if record.len() < 2 {
        return Err(ParseError::Malformed {
            source_id: source_id.to_string(),
            line: line_no,
            reason: format!(
                "expected rank,name,positions,pro_team but found '{}'",
                record.iter().collect::<Vec<_>>().join(",")
            ),
        });
    }

    let mut profile =
        PlayerProfile::from_full_name(&record[1]).map_err(|error| ParseError::Invalid {
            source_id: source_id.to_string(),
            line: line_no,
            error,
        })?;

    if let Some(positions) = record.get(2) {
        let eligible: Vec<String> = positions
            .split('/')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_ascii_uppercase)
            .collect();

        for code in &eligible {
            match code.parse::<Position>() {
                Ok(position) if profile.position.is_none() => profile.position = Some(position),
                Ok(_) => {}
                Err(reason) => tracing::warn!(
                    source = %source_id,
                    line = line_no,
                    player = %profile.full_name,
                    "Invalid position: {}",
                    reason
                ),
            }
        }
        profile.eligible_positions = eligible;
    }

    if let Some(team) = record.get(3).filter(|t| !t.is_empty()) {
        if team.eq_ignore_ascii_case(FREE_AGENT_TEAM) {
            profile.pro_team = None;
        } else if let Some(code) = mlb_team_code(team) {
            profile.pro_team = Some(code.to_string());
        } else {
            tracing::warn!(
                source = %source_id,
                line = line_no,
                player = %profile.full_name,
                "Invalid MLB team: {}",
                team
            );
            profile.pro_team = Some(team.to_string());
        }
    }

    Ok(PlayerStub::seeded(profile, source_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UNRANKED;
    use std::io::Write;

    const LIST: &str = "\
rank,name,positions,team
1,Mike Trout,CF/OF,LAA

2,Jose Altuve,2B,HOU
3,\"Ronald Acuna Jr.\",LF/CF,atl
";

    #[test]
    fn test_parse_list() {
        let parsed = CsvRankingParser::parse_str("2018-ESPN", LIST).unwrap();
        assert_eq!(parsed.source_id, "2018-ESPN");
        assert_eq!(parsed.stubs.len(), 3);

        let trout = &parsed.stubs[0];
        assert_eq!(trout.profile.full_name, "Mike Trout");
        assert_eq!(trout.profile.last_name, "Trout");
        assert_eq!(trout.profile.position, Some(Position::CenterField));
        assert_eq!(trout.profile.eligible_positions, vec!["CF", "OF"]);
        assert_eq!(trout.profile.pro_team.as_deref(), Some("LAA"));

        let acuna = &parsed.stubs[2];
        assert_eq!(acuna.profile.full_name, "Ronald Acuna Jr.");
        assert_eq!(acuna.profile.pro_team.as_deref(), Some("ATL"));
    }

    #[test]
    fn test_ranks_are_positions() {
        let parsed = CsvRankingParser::parse_str("s", LIST).unwrap();
        let ranks: Vec<i32> = parsed.stubs.iter().map(|s| s.rank_for("s").unwrap()).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert!(parsed.stubs.iter().all(|s| s.mentions.len() == 1));
        assert!(ranks.iter().all(|r| *r != UNRANKED));
    }

    #[test]
    fn test_unknown_position_and_team_kept() {
        let parsed = CsvRankingParser::parse_str("s", "1,Shohei Ohtani,XX/DH,Yomiuri\n").unwrap();
        let stub = &parsed.stubs[0];
        assert_eq!(stub.profile.position, Some(Position::DesignatedHitter));
        assert_eq!(stub.profile.pro_team.as_deref(), Some("Yomiuri"));
    }

    #[test]
    fn test_free_agent_team() {
        let parsed = CsvRankingParser::parse_str("s", "1,Dallas Keuchel,SP,FA\n").unwrap();
        assert!(parsed.stubs[0].profile.pro_team.is_none());
    }

    #[test]
    fn test_malformed_line() {
        let err = CsvRankingParser::parse_str("s", "1,Mike Trout,CF,LAA\njunk\n").unwrap_err();
        assert!(matches!(err, ParseError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_quoted_comma_in_name() {
        let parsed =
            CsvRankingParser::parse_str("s", "1,\"Acuna, Ronald\",LF,ATL\n2,Mookie Betts,RF,BOS\n")
                .unwrap();
        assert_eq!(parsed.stubs.len(), 2);

        let acuna = &parsed.stubs[0];
        assert_eq!(acuna.profile.full_name, "Acuna, Ronald");
        assert_eq!(acuna.profile.eligible_positions, vec!["LF"]);
        assert_eq!(acuna.profile.pro_team.as_deref(), Some("ATL"));
        assert_eq!(parsed.stubs[1].rank_for("s"), Some(2));
    }

    #[test]
    fn test_whitespace_only_line_skipped() {
        let parsed = CsvRankingParser::parse_str("s", "1,Mike Trout,CF,LAA\n   \n2,Jose Altuve,2B,HOU\n")
            .unwrap();
        assert_eq!(parsed.stubs.len(), 2);
        assert_eq!(parsed.stubs[1].rank_for("s"), Some(2));
    }

    #[test]
    fn test_empty_name() {
        let err = CsvRankingParser::parse_str("s", "1, ,CF,LAA\n").unwrap_err();
        assert!(matches!(err, ParseError::Invalid { line: 1, .. }));
    }

    #[test]
    fn test_source_id_from_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2018-ESPN.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(LIST.as_bytes()).unwrap();

        let parser = CsvRankingParser::new(&path, None);
        assert_eq!(parser.source_id(), "2018-ESPN");
        assert_eq!(parser.parse().unwrap().stubs.len(), 3);

        let parser = CsvRankingParser::new(&path, Some("ESPN-Top-300".to_string()));
        assert_eq!(parser.parse().unwrap().source_id, "ESPN-Top-300");
    }

    #[test]
    fn test_missing_file() {
        let parser = CsvRankingParser::new("/nonexistent/list.csv", None);
        assert!(matches!(parser.parse(), Err(ParseError::Io { .. })));
    }
}

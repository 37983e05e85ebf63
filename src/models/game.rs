//! Match, Set, Side, Stage and MatchStatus.

use crate::models::competitor::Competitor;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Identifier of a group within a tournament ("A", "B", ... or "main").
pub type GroupId = String;

/// One of the two sides of a match or set.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    One,
    Two,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }
}

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    #[default]
    NotStarted,
    Ongoing,
    Completed,
    /// Result confirmed by an official. Terminal.
    Verified,
    /// Terminal.
    Cancelled,
}

impl MatchStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchStatus::Verified | MatchStatus::Cancelled)
    }

    /// Completed or verified: the result counts towards standings.
    pub fn is_decided(self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Verified)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchStatus::NotStarted => "NOT_STARTED",
            MatchStatus::Ongoing => "ONGOING",
            MatchStatus::Completed => "COMPLETED",
            MatchStatus::Verified => "VERIFIED",
            MatchStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// Phase of the tournament a match belongs to.
///
/// Elimination stages are named after how many competitors enter the round,
/// see [`Stage::for_entrants`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Stage {
    Group,
    Knockout,
    Friendly,
    Final,
    Semifinal,
    Quarterfinal,
    RoundOf16,
    RoundOf32,
    /// Rounds entered by more than 32 competitors.
    Round(usize),
}

impl Stage {
    /// Stage name for an elimination round entered by `count` competitors.
    pub fn for_entrants(count: usize) -> Self {
        match count {
            0..=2 => Stage::Final,
            3..=4 => Stage::Semifinal,
            5..=8 => Stage::Quarterfinal,
            9..=16 => Stage::RoundOf16,
            17..=32 => Stage::RoundOf32,
            n => Stage::Round(n),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Group => f.write_str("GROUP"),
            Stage::Knockout => f.write_str("KNOCKOUT"),
            Stage::Friendly => f.write_str("FRIENDLY"),
            Stage::Final => f.write_str("FINAL"),
            Stage::Semifinal => f.write_str("SEMIFINAL"),
            Stage::Quarterfinal => f.write_str("QUARTERFINAL"),
            Stage::RoundOf16 => f.write_str("ROUND_OF_16"),
            Stage::RoundOf32 => f.write_str("ROUND_OF_32"),
            Stage::Round(n) => write!(f, "ROUND_{}", n),
        }
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stage = match s {
            "GROUP" => Stage::Group,
            "KNOCKOUT" => Stage::Knockout,
            "FRIENDLY" => Stage::Friendly,
            "FINAL" => Stage::Final,
            "SEMIFINAL" => Stage::Semifinal,
            "QUARTERFINAL" => Stage::Quarterfinal,
            "ROUND_OF_16" => Stage::RoundOf16,
            "ROUND_OF_32" => Stage::RoundOf32,
            other => other
                .strip_prefix("ROUND_")
                .and_then(|n| n.parse().ok())
                .map(Stage::Round)
                .ok_or_else(|| format!("unknown stage: {}", other))?,
        };
        Ok(stage)
    }
}

impl Serialize for Stage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Stage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Who occupies a side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entrant {
    Competitor(Competitor),
    /// Bracket slot filled by the winner of an earlier match (1-based round and number).
    WinnerOf { round: usize, match_number: u32 },
}

impl Entrant {
    pub fn competitor(&self) -> Option<&Competitor> {
        match self {
            Entrant::Competitor(c) => Some(c),
            Entrant::WinnerOf { .. } => None,
        }
    }

    /// `(round, match_number)` of the bracket match this placeholder waits on.
    pub fn source(&self) -> Option<(usize, u32)> {
        match *self {
            Entrant::Competitor(_) => None,
            Entrant::WinnerOf {
                round,
                match_number,
            } => Some((round, match_number)),
        }
    }
}

impl From<Competitor> for Entrant {
    fn from(c: Competitor) -> Self {
        Entrant::Competitor(c)
    }
}

/// One game within a match.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Set {
    /// 1-based position within the match.
    pub number: u32,
    pub side_1_score: u32,
    pub side_2_score: u32,
    /// Frozen: no further points are accepted until reset.
    pub completed: bool,
    pub winner: Option<Side>,
}

impl Set {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::One => self.side_1_score,
            Side::Two => self.side_2_score,
        }
    }

    pub(crate) fn score_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::One => &mut self.side_1_score,
            Side::Two => &mut self.side_2_score,
        }
    }
}

/// A single match between two sides, scored in sets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// Display label of the round ("Round Robin", "Round 2", ...).
    pub round: String,
    /// Sequence number within the round, starting at 1.
    pub match_number: u32,
    pub stage: Stage,
    pub group_id: Option<GroupId>,
    pub side_1: Entrant,
    pub side_2: Entrant,
    /// Bracket match (round, number) whose winner fills each side, if any.
    /// Kept after the slot is filled so a changed result moves with it.
    #[serde(default)]
    pub feeders: [Option<(usize, u32)>; 2],
    pub status: MatchStatus,
    pub sets: Vec<Set>,
    /// None until decided.
    pub winner: Option<Side>,
    pub table: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Match {
    pub fn new(
        tournament_id: TournamentId,
        round: impl Into<String>,
        match_number: u32,
        stage: Stage,
        side_1: Entrant,
        side_2: Entrant,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round: round.into(),
            match_number,
            stage,
            group_id: None,
            side_1,
            side_2,
            feeders: [None, None],
            status: MatchStatus::NotStarted,
            sets: Vec::new(),
            winner: None,
            table: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    pub fn entrant(&self, side: Side) -> &Entrant {
        match side {
            Side::One => &self.side_1,
            Side::Two => &self.side_2,
        }
    }

    pub fn competitor(&self, side: Side) -> Option<&Competitor> {
        self.entrant(side).competitor()
    }

    /// Side occupied by `id` (player, pair or pair member), if any.
    pub fn side_of(&self, id: Uuid) -> Option<Side> {
        [Side::One, Side::Two]
            .into_iter()
            .find(|&side| self.competitor(side).is_some_and(|c| c.involves(id)))
    }

    /// Both sides hold a competitor (no bracket placeholder left).
    pub fn has_both_competitors(&self) -> bool {
        self.side_1.competitor().is_some() && self.side_2.competitor().is_some()
    }

    pub fn winning_competitor(&self) -> Option<&Competitor> {
        self.winner.and_then(|side| self.competitor(side))
    }

    /// The set currently being played (the last one).
    pub fn active_set(&self) -> Option<&Set> {
        self.sets.last()
    }
}

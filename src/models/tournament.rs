//! Tournament, its format, and the generated structure (groups and bracket).

use crate::models::competitor::{Competitor, Pair, PairId, Player, PlayerId};
use crate::models::game::{GroupId, Match, MatchId, MatchStatus, Stage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Not enough distinct players for the game type.
    NotEnoughPlayers { required: usize },
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Player not found in the roster.
    PlayerNotFound(PlayerId),
    /// Player is already part of a doubles pair.
    PlayerAlreadyPaired(PlayerId),
    /// No match with this id in the tournament.
    MatchNotFound(MatchId),
    /// Status change not allowed from the current status.
    InvalidTransition { from: MatchStatus, to: MatchStatus },
    /// More sets recorded than a match can have.
    TooManySets(usize),
    /// Set numbers must run 1, 2, 3, ... in order.
    SetOutOfOrder { expected: u32, found: u32 },
    /// Completed flag or winner disagrees with the set's scores.
    InconsistentSet(u32),
    /// A set was recorded after the match had already been won.
    SetAfterMatchDecided(u32),
    /// Unknown tournament format name.
    UnknownFormat(String),
    /// A side is still waiting on an earlier bracket result.
    EntrantsUndecided(MatchId),
    /// The round robin still has this many matches to finish.
    GroupPlayUnfinished(usize),
    /// Operation does not apply to this tournament format.
    UnsupportedFormat(TournamentFormat),
    /// Roster could not be read.
    Roster(String),
}

impl fmt::Display for TournamentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentError::NotEnoughPlayers { required } => {
                write!(f, "Need at least {} players", required)
            }
            TournamentError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            TournamentError::PlayerNotFound(_) => write!(f, "Player not found"),
            TournamentError::PlayerAlreadyPaired(_) => write!(f, "Player is already in a pair"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::InvalidTransition { from, to } => {
                write!(f, "Cannot move match from {} to {}", from, to)
            }
            TournamentError::TooManySets(n) => write!(f, "Match has {} sets, at most 5 allowed", n),
            TournamentError::SetOutOfOrder { expected, found } => {
                write!(f, "Expected set {} but found set {}", expected, found)
            }
            TournamentError::InconsistentSet(n) => {
                write!(f, "Set {} completion does not match its score", n)
            }
            TournamentError::SetAfterMatchDecided(n) => {
                write!(f, "Set {} was recorded after the match was decided", n)
            }
            TournamentError::EntrantsUndecided(_) => {
                write!(f, "Match is still waiting on an earlier result")
            }
            TournamentError::GroupPlayUnfinished(open) => {
                write!(f, "{} round robin matches are still open", open)
            }
            TournamentError::UnknownFormat(name) => write!(f, "Unknown tournament format: {}", name),
            TournamentError::UnsupportedFormat(format) => {
                write!(f, "Not available for {} tournaments", format)
            }
            TournamentError::Roster(msg) => write!(f, "Could not read roster: {}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// How the tournament is played.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentFormat {
    /// Everyone plays everyone.
    #[default]
    RoundRobin,
    /// Round robin, then 1st vs 2nd, 3rd vs 4th, ...
    RoundRobinKnockout,
    /// Several round robin groups.
    GroupRoundRobin,
    SingleElimination,
    DoubleElimination,
    /// Matches added by hand.
    Friendly,
}

impl fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TournamentFormat::RoundRobin => "ROUND_ROBIN",
            TournamentFormat::RoundRobinKnockout => "ROUND_ROBIN_KNOCKOUT",
            TournamentFormat::GroupRoundRobin => "GROUP_ROUND_ROBIN",
            TournamentFormat::SingleElimination => "SINGLE_ELIMINATION",
            TournamentFormat::DoubleElimination => "DOUBLE_ELIMINATION",
            TournamentFormat::Friendly => "FRIENDLY",
        };
        f.write_str(s)
    }
}

impl FromStr for TournamentFormat {
    type Err = TournamentError;

    /// Case-insensitive; accepts `-` in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "ROUND_ROBIN" => Ok(TournamentFormat::RoundRobin),
            "ROUND_ROBIN_KNOCKOUT" => Ok(TournamentFormat::RoundRobinKnockout),
            "GROUP_ROUND_ROBIN" => Ok(TournamentFormat::GroupRoundRobin),
            "SINGLE_ELIMINATION" => Ok(TournamentFormat::SingleElimination),
            "DOUBLE_ELIMINATION" => Ok(TournamentFormat::DoubleElimination),
            "FRIENDLY" => Ok(TournamentFormat::Friendly),
            _ => Err(TournamentError::UnknownFormat(s.to_string())),
        }
    }
}

/// Singles or doubles.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameType {
    #[default]
    Single,
    Double,
}

impl GameType {
    /// Distinct players needed before a schedule can be generated.
    pub fn min_players(self) -> usize {
        match self {
            GameType::Single => 2,
            GameType::Double => 4,
        }
    }
}

/// A named slice of the roster playing its own round robin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub competitors: Vec<Competitor>,
    pub matches: Vec<Match>,
}

/// One round of an elimination bracket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketRound {
    /// 1-based.
    pub number: usize,
    /// Named after the number of competitors entering the round.
    pub stage: Stage,
    pub matches: Vec<Match>,
}

/// Everything the generator produces for a format.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentStructure {
    pub groups: Vec<Group>,
    pub bracket: Vec<BracketRound>,
}

impl TournamentStructure {
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.groups
            .iter()
            .flat_map(|g| g.matches.iter())
            .chain(self.bracket.iter().flat_map(|r| r.matches.iter()))
    }

    pub fn matches_mut(&mut self) -> impl Iterator<Item = &mut Match> {
        self.groups
            .iter_mut()
            .flat_map(|g| g.matches.iter_mut())
            .chain(self.bracket.iter_mut().flat_map(|r| r.matches.iter_mut()))
    }
}

/// Full tournament: roster, format and generated matches.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub title: String,
    pub format: TournamentFormat,
    pub game_type: GameType,
    pub players: Vec<Player>,
    /// Doubles pairs (empty for singles).
    pub pairs: Vec<Pair>,
    pub structure: TournamentStructure,
    /// Second phase of a round robin + knockout tournament.
    pub knockout: Vec<Match>,
    /// Hand-made matches of a friendly tournament.
    pub friendlies: Vec<Match>,
}

impl Tournament {
    /// Create a new tournament with no players.
    pub fn new(title: impl Into<String>, format: TournamentFormat, game_type: GameType) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            format,
            game_type,
            players: Vec::new(),
            pairs: Vec::new(),
            structure: TournamentStructure::default(),
            knockout: Vec::new(),
            friendlies: Vec::new(),
        }
    }

    /// Create a tournament with initial players.
    pub fn with_players(players: Vec<Player>, format: TournamentFormat, game_type: GameType) -> Self {
        Self {
            players,
            ..Self::new("", format, game_type)
        }
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Add a player. Names must be unique (case-insensitive).
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, TournamentError> {
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::Roster("empty player name".to_string()));
        }
        let is_duplicate = self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(TournamentError::DuplicatePlayerName);
        }
        let player = Player::new(name_trimmed);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Remove a player by id, along with any pair they belong to.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), TournamentError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        self.players.remove(idx);
        self.pairs
            .retain(|p| p.player_1.id != player_id && p.player_2.id != player_id);
        Ok(())
    }

    /// Pair two registered players for doubles.
    pub fn add_pair(
        &mut self,
        player_1: PlayerId,
        player_2: PlayerId,
        team_name: Option<String>,
    ) -> Result<PairId, TournamentError> {
        if player_1 == player_2 {
            return Err(TournamentError::PlayerAlreadyPaired(player_2));
        }
        for id in [player_1, player_2] {
            let paired = self
                .pairs
                .iter()
                .any(|p| p.player_1.id == id || p.player_2.id == id);
            if paired {
                return Err(TournamentError::PlayerAlreadyPaired(id));
            }
        }
        let p1 = self
            .get_player(player_1)
            .cloned()
            .ok_or(TournamentError::PlayerNotFound(player_1))?;
        let p2 = self
            .get_player(player_2)
            .cloned()
            .ok_or(TournamentError::PlayerNotFound(player_2))?;
        let pair = Pair::new(p1, p2, team_name);
        let id = pair.id;
        self.pairs.push(pair);
        Ok(id)
    }

    /// Competitors in roster order: players for singles, pairs for doubles.
    pub fn competitors(&self) -> Vec<Competitor> {
        match self.game_type {
            GameType::Single => self.players.iter().map(Player::competitor).collect(),
            GameType::Double => self.pairs.iter().map(Pair::competitor).collect(),
        }
    }

    /// Number of distinct players taking part.
    pub fn distinct_player_count(&self) -> usize {
        match self.game_type {
            GameType::Single => self.players.len(),
            GameType::Double => self.pairs.len() * 2,
        }
    }

    /// Display name for a player or pair id.
    pub fn display_name(&self, id: Uuid) -> Option<String> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .or_else(|| self.pairs.iter().find(|p| p.id == id).map(Pair::display_name))
    }

    /// Every match of the tournament, in structure order.
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.structure
            .matches()
            .chain(self.knockout.iter())
            .chain(self.friendlies.iter())
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Result<&mut Match, TournamentError> {
        self.structure
            .matches_mut()
            .chain(self.knockout.iter_mut())
            .chain(self.friendlies.iter_mut())
            .find(|m| m.id == id)
            .ok_or(TournamentError::MatchNotFound(id))
    }
}

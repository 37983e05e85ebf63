//! Data structures for the tournament engine: competitors, matches, sets, standings.

mod competitor;
mod game;
mod stats;
mod tournament;

pub use competitor::{Competitor, Pair, PairId, Player, PlayerId};
pub use game::{Entrant, GroupId, Match, MatchId, MatchStatus, Set, Side, Stage};
pub use stats::{PlayerRanking, PlayerStats, TieBreakData, TieDraw};
pub use tournament::{
    BracketRound, GameType, Group, Tournament, TournamentError, TournamentFormat, TournamentId,
    TournamentStructure,
};

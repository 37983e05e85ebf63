//! Table tennis tournament engine: schedules, point-by-point scoring and standings.

pub mod logic;
pub mod models;

pub use logic::{
    add_friendly_match, apply_match_point, apply_point, cancel_match, compute_rankings,
    compute_stats, compute_tie_break_data, current_server, generate_group_partition,
    generate_knockout_from_standings, generate_round_robin, generate_single_elimination,
    generate_structure, generate_tournament_structure, is_match_complete, is_set_complete,
    load_roster, match_winner, record_point, reset_current_set, reset_match_set, reset_set,
    resolve_tie_order,
    round_robin_points, serving_side, set_winner, start_knockout, tournament_rankings,
    validate_match, verify_match, ScoreUpdate,
};
pub use models::{
    BracketRound, Competitor, Entrant, GameType, Group, Match, MatchId, MatchStatus, Pair, PairId,
    Player, PlayerId, PlayerRanking, PlayerStats, Set, Side, Stage, TieBreakData, TieDraw,
    Tournament, TournamentError, TournamentFormat, TournamentId, TournamentStructure,
};

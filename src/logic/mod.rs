//! Tournament engine logic: schedule generation, scoring, rankings, roster import.

mod ranking;
mod roster;
mod schedule;
mod scoring;

pub use ranking::{
    compute_rankings, compute_stats, compute_tie_break_data, group_rankings, resolve_tie_order,
    round_robin_points, tournament_rankings, POINTS_FOR_DRAW, POINTS_FOR_WIN,
};
pub use roster::load_roster;
pub use schedule::{
    add_friendly_match, advance_bracket_winner, friendly_match, generate_group_partition,
    generate_knockout_from_standings, generate_round_robin, generate_single_elimination,
    generate_structure, generate_tournament_structure, start_knockout, ROUND_ROBIN_LABEL,
};
pub use scoring::{
    apply_match_point, apply_point, cancel_match, current_server, is_match_complete,
    is_set_complete, match_winner, record_point, reset_current_set, reset_match_set, reset_set,
    serving_side, set_winner, sets_won, total_points, validate_match, verify_match, ScoreUpdate,
    DEUCE_LEAD_REQUIRED, DEUCE_POINT, MAX_SETS, POINTS_TO_WIN_SET, SETS_TO_WIN,
};

//! Scoring: point application, set and match completion, serve order, status changes.
//!
//! Completion and serve side are always recomputed from the scores. The
//! stored `completed`/`winner` fields on a set are only written by
//! [`apply_point`] and [`reset_set`].

use crate::logic::schedule::advance_bracket_winner;
use crate::models::{Match, MatchId, MatchStatus, Set, Side, Tournament, TournamentError};
use chrono::Utc;
use log::{debug, info};

/// Points needed to win a set outside deuce.
pub const POINTS_TO_WIN_SET: u32 = 11;
/// Both sides at or above this score means deuce.
pub const DEUCE_POINT: u32 = 10;
/// Lead needed to win a set from deuce.
pub const DEUCE_LEAD_REQUIRED: u32 = 2;
/// Sets needed to win a match.
pub const SETS_TO_WIN: usize = 3;
/// Best of five.
pub const MAX_SETS: usize = 5;

/// What a point application did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScoreUpdate {
    /// Nothing changed: frozen set, finished match, or a decrement at zero.
    Ignored,
    Updated,
    SetWon(Side),
    MatchWon(Side),
}

/// 11 against less than 10, or a 2-point lead once both have 10.
pub fn is_set_complete(side_1: u32, side_2: u32) -> bool {
    let regular = (side_1 >= POINTS_TO_WIN_SET && side_2 < DEUCE_POINT)
        || (side_2 >= POINTS_TO_WIN_SET && side_1 < DEUCE_POINT);
    let deuce = side_1 >= DEUCE_POINT
        && side_2 >= DEUCE_POINT
        && side_1.abs_diff(side_2) >= DEUCE_LEAD_REQUIRED;
    regular || deuce
}

/// Winner of a finished set; `None` while the set is open.
pub fn set_winner(side_1: u32, side_2: u32) -> Option<Side> {
    if !is_set_complete(side_1, side_2) {
        return None;
    }
    Some(if side_1 > side_2 { Side::One } else { Side::Two })
}

/// Serve changes every two points, side one first.
pub fn serving_side(side_1: u32, side_2: u32) -> Side {
    if (side_1.saturating_add(side_2) / 2) % 2 == 0 {
        Side::One
    } else {
        Side::Two
    }
}

/// Add `delta` (may be negative) to one side of a set.
///
/// Frozen sets ignore the write. Scores never drop below zero. When the set
/// becomes complete it is frozen and its winner recorded.
pub fn apply_point(set: &mut Set, side: Side, delta: i32) -> ScoreUpdate {
    if set.completed {
        return ScoreUpdate::Ignored;
    }
    let score = set.score_mut(side);
    let updated = (i64::from(*score) + i64::from(delta)).clamp(0, i64::from(u32::MAX)) as u32;
    if updated == *score {
        return ScoreUpdate::Ignored;
    }
    *score = updated;

    match set_winner(set.side_1_score, set.side_2_score) {
        Some(winner) => {
            set.completed = true;
            set.winner = Some(winner);
            ScoreUpdate::SetWon(winner)
        }
        None => ScoreUpdate::Updated,
    }
}

/// Zero both scores and unfreeze the set.
pub fn reset_set(set: &mut Set) {
    set.side_1_score = 0;
    set.side_2_score = 0;
    set.completed = false;
    set.winner = None;
}

/// First side to reach three set wins, scanning sets in order.
pub fn match_winner(sets: &[Set]) -> Option<Side> {
    let mut won = [0usize; 2];
    for set in sets {
        match set_winner(set.side_1_score, set.side_2_score) {
            Some(Side::One) => won[0] += 1,
            Some(Side::Two) => won[1] += 1,
            None => {}
        }
        if won[0] >= SETS_TO_WIN {
            return Some(Side::One);
        }
        if won[1] >= SETS_TO_WIN {
            return Some(Side::Two);
        }
    }
    None
}

pub fn is_match_complete(sets: &[Set]) -> bool {
    match_winner(sets).is_some()
}

/// Sets won by (side one, side two).
pub fn sets_won(m: &Match) -> (u32, u32) {
    m.sets.iter().fold((0, 0), |(a, b), set| {
        match set_winner(set.side_1_score, set.side_2_score) {
            Some(Side::One) => (a + 1, b),
            Some(Side::Two) => (a, b + 1),
            None => (a, b),
        }
    })
}

/// Points scored by (side one, side two) across all sets.
pub fn total_points(m: &Match) -> (u32, u32) {
    m.sets
        .iter()
        .fold((0u32, 0u32), |(a, b), set| {
            (a.saturating_add(set.side_1_score), b.saturating_add(set.side_2_score))
        })
}

/// Side serving in the active set, if the match has one.
pub fn current_server(m: &Match) -> Option<Side> {
    m.active_set()
        .map(|set| serving_side(set.side_1_score, set.side_2_score))
}

/// Apply a point to the active set of a match.
///
/// Opens set 1 on the first point. When a set is won and the match is not,
/// the next set is opened (up to five). When the match is won the winner is
/// recorded and the match moves to `Completed`. Finished, verified and
/// cancelled matches ignore points.
pub fn apply_match_point(m: &mut Match, side: Side, delta: i32) -> ScoreUpdate {
    if m.status.is_terminal() || m.status == MatchStatus::Completed {
        return ScoreUpdate::Ignored;
    }
    if m.sets.is_empty() {
        m.sets.push(Set::new(1));
    }
    let Some(set) = m.sets.last_mut() else {
        return ScoreUpdate::Ignored;
    };
    let update = apply_point(set, side, delta);
    if update == ScoreUpdate::Ignored {
        return update;
    }
    if m.status == MatchStatus::NotStarted {
        m.status = MatchStatus::Ongoing;
        m.started_at = Some(Utc::now());
    }

    if let ScoreUpdate::SetWon(set_side) = update {
        if let Some(winner) = match_winner(&m.sets) {
            m.winner = Some(winner);
            m.status = MatchStatus::Completed;
            m.completed_at = Some(Utc::now());
            let (a, b) = sets_won(m);
            info!("Match {} won by side {:?} ({}-{})", m.id, winner, a, b);
            return ScoreUpdate::MatchWon(winner);
        }
        if m.sets.len() < MAX_SETS {
            let number = m.sets.len() as u32 + 1;
            m.sets.push(Set::new(number));
        }
        debug!("Match {}: set won by side {:?}", m.id, set_side);
    }
    update
}

/// Reset the active set of a match (umpire correction).
///
/// If that undoes the deciding set, the match goes back to `Ongoing`.
/// Verified and cancelled matches are left untouched.
pub fn reset_current_set(m: &mut Match) {
    if m.status.is_terminal() {
        return;
    }
    let Some(set) = m.sets.last_mut() else {
        return;
    };
    reset_set(set);
    if m.status == MatchStatus::Completed && match_winner(&m.sets).is_none() {
        m.status = MatchStatus::Ongoing;
        m.winner = None;
        m.completed_at = None;
    }
}

/// `Completed -> Verified`.
pub fn verify_match(m: &mut Match) -> Result<(), TournamentError> {
    if m.status != MatchStatus::Completed {
        return Err(TournamentError::InvalidTransition {
            from: m.status,
            to: MatchStatus::Verified,
        });
    }
    m.status = MatchStatus::Verified;
    info!("Match {} verified", m.id);
    Ok(())
}

/// Cancel from any non-terminal status.
pub fn cancel_match(m: &mut Match) -> Result<(), TournamentError> {
    if m.status.is_terminal() {
        return Err(TournamentError::InvalidTransition {
            from: m.status,
            to: MatchStatus::Cancelled,
        });
    }
    m.status = MatchStatus::Cancelled;
    info!("Match {} cancelled", m.id);
    Ok(())
}

/// Reject malformed set lists before they reach the scoring rules.
pub fn validate_match(m: &Match) -> Result<(), TournamentError> {
    if m.sets.len() > MAX_SETS {
        return Err(TournamentError::TooManySets(m.sets.len()));
    }
    let mut decided = false;
    let last = m.sets.len().saturating_sub(1);
    for (i, set) in m.sets.iter().enumerate() {
        let expected = i as u32 + 1;
        if set.number != expected {
            return Err(TournamentError::SetOutOfOrder {
                expected,
                found: set.number,
            });
        }
        if decided {
            return Err(TournamentError::SetAfterMatchDecided(set.number));
        }
        let winner = set_winner(set.side_1_score, set.side_2_score);
        if set.completed != winner.is_some() || set.winner != winner {
            return Err(TournamentError::InconsistentSet(set.number));
        }
        // Only the active set may still be open.
        if i < last && winner.is_none() {
            return Err(TournamentError::InconsistentSet(set.number));
        }
        decided = is_match_complete(&m.sets[..=i]);
    }
    Ok(())
}

/// Record a point on one of the tournament's matches.
///
/// A won bracket match moves its winner into the next round. Bracket matches
/// still waiting on an earlier result cannot be scored.
pub fn record_point(
    tournament: &mut Tournament,
    match_id: MatchId,
    side: Side,
    delta: i32,
) -> Result<ScoreUpdate, TournamentError> {
    let m = tournament.get_match_mut(match_id)?;
    if !m.has_both_competitors() {
        return Err(TournamentError::EntrantsUndecided(match_id));
    }
    let update = apply_match_point(m, side, delta);
    if let ScoreUpdate::MatchWon(_) = update {
        advance_bracket_winner(&mut tournament.structure, match_id);
    }
    Ok(update)
}

/// Reset the active set of one of the tournament's matches.
///
/// Reopening a won bracket match takes its winner back out of the next round.
pub fn reset_match_set(
    tournament: &mut Tournament,
    match_id: MatchId,
) -> Result<(), TournamentError> {
    let m = tournament.get_match_mut(match_id)?;
    reset_current_set(m);
    advance_bracket_winner(&mut tournament.structure, match_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_completion_table() {
        assert_eq!(set_winner(11, 7), Some(Side::One));
        assert_eq!(set_winner(11, 9), Some(Side::One));
        assert_eq!(set_winner(10, 10), None);
        assert_eq!(set_winner(11, 10), None);
        assert_eq!(set_winner(12, 10), Some(Side::One));
        assert_eq!(set_winner(13, 12), None);
        assert_eq!(set_winner(15, 13), Some(Side::One));
        assert_eq!(set_winner(4, 11), Some(Side::Two));
        assert_eq!(set_winner(0, 0), None);
    }

    #[test]
    fn serve_changes_every_two_points() {
        assert_eq!(serving_side(0, 0), Side::One);
        assert_eq!(serving_side(1, 0), Side::One);
        assert_eq!(serving_side(0, 1), Side::One);
        assert_eq!(serving_side(1, 1), Side::Two);
        assert_eq!(serving_side(3, 0), Side::Two);
        assert_eq!(serving_side(2, 2), Side::One);
        assert_eq!(serving_side(10, 10), Side::One);
        assert_eq!(serving_side(11, 10), Side::One);
        assert_eq!(serving_side(11, 11), Side::Two);
    }

    #[test]
    fn serve_side_survives_huge_scores() {
        let mut set = Set::new(1);
        set.side_1_score = u32::MAX - 4;
        set.side_2_score = u32::MAX - 3;
        assert_eq!(apply_point(&mut set, Side::One, i32::MAX), ScoreUpdate::SetWon(Side::One));
        assert_eq!(set.side_1_score, u32::MAX);
        assert_eq!(serving_side(set.side_1_score, set.side_2_score), Side::Two);
    }
}

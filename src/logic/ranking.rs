//! Standings: per-competitor statistics, head-to-head tallies and the tie-break cascade.
//!
//! Only completed or verified matches count. Everything here is recomputed
//! from the match list on each call.

use crate::logic::scoring::set_winner;
use crate::models::{
    Competitor, Group, Match, PlayerRanking, PlayerStats, Side, TieBreakData, TieDraw, Tournament,
};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::cmp::Ordering;
use std::ops::Range;
use uuid::Uuid;

/// Standings points for a round robin win.
pub const POINTS_FOR_WIN: u32 = 3;
/// Standings points for a decided match without a winner.
pub const POINTS_FOR_DRAW: u32 = 1;

/// `won / lost`, or `won` itself when nothing was lost.
fn ratio(won: u32, lost: u32) -> f64 {
    if lost > 0 {
        f64::from(won) / f64::from(lost)
    } else {
        f64::from(won)
    }
}

/// Decided matches involving `id`, with the side it played on.
fn decided_matches(id: Uuid, matches: &[Match]) -> impl Iterator<Item = (&Match, Side)> {
    matches
        .iter()
        .filter(|m| m.status.is_decided())
        .filter_map(move |m| m.side_of(id).map(|side| (m, side)))
}

/// Totals for a player, pair, or (for doubles) a player across their pairs.
pub fn compute_stats(id: Uuid, matches: &[Match]) -> PlayerStats {
    let mut stats = PlayerStats {
        competitor_id: id,
        ..PlayerStats::default()
    };

    for (m, side) in decided_matches(id, matches) {
        stats.matches_played += 1;
        match m.winner {
            Some(w) if w == side => stats.matches_won += 1,
            Some(_) => stats.matches_lost += 1,
            None => {}
        }
        for set in &m.sets {
            stats.points_won += set.score(side);
            stats.points_lost += set.score(side.other());
            match set_winner(set.side_1_score, set.side_2_score) {
                Some(w) if w == side => stats.sets_won += 1,
                Some(_) => stats.sets_lost += 1,
                None => {}
            }
        }
    }

    stats.win_percentage = if stats.matches_played > 0 {
        f64::from(stats.matches_won) / f64::from(stats.matches_played) * 100.0
    } else {
        0.0
    };
    stats.set_ratio = ratio(stats.sets_won, stats.sets_lost);
    stats.point_ratio = ratio(stats.points_won, stats.points_lost);
    stats
}

/// Head-to-head tally per opponent plus the ratios from [`compute_stats`].
///
/// Matches without a winner leave the tally untouched.
pub fn compute_tie_break_data(id: Uuid, matches: &[Match]) -> TieBreakData {
    let stats = compute_stats(id, matches);
    let mut data = TieBreakData {
        set_ratio: stats.set_ratio,
        point_ratio: stats.point_ratio,
        ..TieBreakData::default()
    };
    for (m, side) in decided_matches(id, matches) {
        let (Some(winner), Some(opponent)) = (m.winner, m.competitor(side.other())) else {
            continue;
        };
        let delta = if winner == side { 1 } else { -1 };
        *data.head_to_head.entry(opponent.id()).or_insert(0) += delta;
    }
    data
}

/// 3 per win, 1 per decided match without a winner, 0 per loss.
pub fn round_robin_points(id: Uuid, matches: &[Match]) -> u32 {
    decided_matches(id, matches)
        .map(|(m, side)| match m.winner {
            Some(w) if w == side => POINTS_FOR_WIN,
            Some(_) => 0,
            None => POINTS_FOR_DRAW,
        })
        .sum()
}

/// Head-to-head sum, then set ratio, then point ratio; all descending.
fn compare_tie_break(a: &PlayerRanking, b: &PlayerRanking) -> Ordering {
    b.tie_break
        .head_to_head_total()
        .cmp(&a.tie_break.head_to_head_total())
        .then_with(|| b.tie_break.set_ratio.total_cmp(&a.tie_break.set_ratio))
        .then_with(|| b.tie_break.point_ratio.total_cmp(&a.tie_break.point_ratio))
}

/// Index ranges of consecutive items that compare equal.
fn equal_runs<T>(items: &[T], same: impl Fn(&T, &T) -> bool) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=items.len() {
        if i == items.len() || !same(&items[i - 1], &items[i]) {
            runs.push(start..i);
            start = i;
        }
    }
    runs
}

fn draw_rng(draw: TieDraw) -> Option<StdRng> {
    match draw {
        TieDraw::InputOrder => None,
        TieDraw::Seeded(seed) => Some(StdRng::seed_from_u64(seed)),
    }
}

fn resolve_with(candidates: &mut [PlayerRanking], rng: &mut Option<StdRng>) {
    candidates.sort_by(compare_tie_break);
    let Some(rng) = rng.as_mut() else {
        return;
    };
    for run in equal_runs(candidates, |a, b| compare_tie_break(a, b) == Ordering::Equal) {
        if run.len() > 1 {
            debug!("Drawing lots for {} fully tied competitors", run.len());
            candidates[run].shuffle(rng);
        }
    }
}

/// Order candidates already level on points.
///
/// Stable: candidates equal on every criterion keep their input order, unless
/// `draw` is [`TieDraw::Seeded`], in which case each fully tied run is
/// shuffled with that seed.
pub fn resolve_tie_order(candidates: &mut [PlayerRanking], draw: TieDraw) {
    if candidates.len() <= 1 {
        return;
    }
    resolve_with(candidates, &mut draw_rng(draw));
}

fn ranking_for(id: Uuid, matches: &[Match]) -> PlayerRanking {
    PlayerRanking {
        position: 0,
        competitor_id: id,
        points: round_robin_points(id, matches),
        stats: compute_stats(id, matches),
        tie_break: compute_tie_break_data(id, matches),
    }
}

/// Full standings: points descending, ties resolved, positions 1..=n.
pub fn compute_rankings(ids: &[Uuid], matches: &[Match], draw: TieDraw) -> Vec<PlayerRanking> {
    let mut rankings: Vec<PlayerRanking> = ids.iter().map(|&id| ranking_for(id, matches)).collect();
    rankings.sort_by(|a, b| b.points.cmp(&a.points));

    let mut rng = draw_rng(draw);
    for run in equal_runs(&rankings, |a, b| a.points == b.points) {
        if run.len() > 1 {
            resolve_with(&mut rankings[run], &mut rng);
        }
    }
    for (i, r) in rankings.iter_mut().enumerate() {
        r.position = i as u32 + 1;
    }
    rankings
}

/// Standings within one group.
pub fn group_rankings(group: &Group, draw: TieDraw) -> Vec<PlayerRanking> {
    let ids: Vec<Uuid> = group.competitors.iter().map(Competitor::id).collect();
    compute_rankings(&ids, &group.matches, draw)
}

/// Standings over every match of the tournament.
pub fn tournament_rankings(tournament: &Tournament, draw: TieDraw) -> Vec<PlayerRanking> {
    let ids: Vec<Uuid> = tournament.competitors().iter().map(Competitor::id).collect();
    let matches: Vec<Match> = tournament.matches().cloned().collect();
    compute_rankings(&ids, &matches, draw)
}

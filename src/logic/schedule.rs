//! Match generation: round robin, groups, single-elimination bracket and knockout.
//!
//! Generators never validate competitor counts; see
//! [`generate_tournament_structure`] for the checked entry point.

use crate::logic::ranking::compute_rankings;
use crate::models::{
    BracketRound, Competitor, Entrant, Group, Match, MatchId, MatchStatus, PlayerRanking, Stage,
    TieDraw, Tournament, TournamentError, TournamentFormat, TournamentId, TournamentStructure,
};
use log::{debug, warn};
use uuid::Uuid;

/// Round label used for round robin matches.
pub const ROUND_ROBIN_LABEL: &str = "Round Robin";

/// One match for every unordered pair `(i, j)`, `i < j`, numbered 1.. in that order.
///
/// Works the same for singles and pairs.
pub fn generate_round_robin(
    tournament_id: TournamentId,
    competitors: &[Competitor],
    group_id: Option<&str>,
) -> Vec<Match> {
    let mut matches = Vec::with_capacity(competitors.len() * competitors.len().saturating_sub(1) / 2);
    let mut match_number = 1;
    for (i, a) in competitors.iter().enumerate() {
        for b in &competitors[i + 1..] {
            let mut m = Match::new(
                tournament_id,
                ROUND_ROBIN_LABEL,
                match_number,
                Stage::Group,
                Entrant::Competitor(*a),
                Entrant::Competitor(*b),
            );
            m.group_id = group_id.map(str::to_string);
            matches.push(m);
            match_number += 1;
        }
    }
    debug!(
        "Generated {} round robin matches for {} competitors",
        matches.len(),
        competitors.len()
    );
    matches
}

/// Split the competitors into `group_count` contiguous groups of `ceil(n / group_count)`.
///
/// Trailing groups may be short; empty ones are dropped. Groups are lettered
/// A, B, C, ... and each gets its own round robin.
pub fn generate_group_partition(
    tournament_id: TournamentId,
    competitors: &[Competitor],
    group_count: usize,
) -> Vec<Group> {
    let group_count = group_count.max(1);
    let size = competitors.len().div_ceil(group_count);
    if size == 0 {
        return Vec::new();
    }
    competitors
        .chunks(size)
        .take(group_count)
        .enumerate()
        .map(|(i, chunk)| {
            let id = group_letter(i);
            let matches = generate_round_robin(tournament_id, chunk, Some(id.as_str()));
            Group {
                name: format!("Group {}", id),
                id,
                competitors: chunk.to_vec(),
                matches,
            }
        })
        .collect()
}

/// "A" for 0, "B" for 1, ... "Z", then "AA", "AB", ...
fn group_letter(index: usize) -> String {
    let mut n = index;
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'A' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Single-elimination bracket.
///
/// Each round pairs survivors two at a time in order. An odd trailing
/// competitor gets a bye and goes straight to the next round. Later rounds
/// refer to earlier match winners via [`Entrant::WinnerOf`].
pub fn generate_single_elimination(
    tournament_id: TournamentId,
    competitors: &[Competitor],
) -> Vec<BracketRound> {
    let mut rounds = Vec::new();
    let mut survivors: Vec<Entrant> = competitors.iter().copied().map(Entrant::from).collect();

    while survivors.len() > 1 {
        let number = rounds.len() + 1;
        let stage = Stage::for_entrants(survivors.len());
        let label = format!("Round {}", number);

        let mut matches = Vec::with_capacity(survivors.len() / 2);
        let mut next = Vec::with_capacity(survivors.len().div_ceil(2));
        for (i, pair) in survivors.chunks(2).enumerate() {
            match pair {
                [a, b] => {
                    let match_number = i as u32 + 1;
                    let mut m = Match::new(tournament_id, &label, match_number, stage, *a, *b);
                    m.feeders = [a.source(), b.source()];
                    matches.push(m);
                    next.push(Entrant::WinnerOf {
                        round: number,
                        match_number,
                    });
                }
                [bye] => next.push(*bye),
                _ => unreachable!("chunks(2) yields one or two items"),
            }
        }

        debug!(
            "Bracket round {} ({}): {} entrants, {} matches",
            number,
            stage,
            survivors.len(),
            matches.len()
        );
        rounds.push(BracketRound {
            number,
            stage,
            matches,
        });
        survivors = next;
    }
    rounds
}

/// Point the later-round slot fed by this bracket match at its current winner.
///
/// A match without a winner (never won, or reopened by a set reset) puts the
/// placeholder back. Does nothing for matches outside the bracket.
pub fn advance_bracket_winner(structure: &mut TournamentStructure, match_id: MatchId) {
    let source = structure.bracket.iter().find_map(|round| {
        round
            .matches
            .iter()
            .find(|m| m.id == match_id)
            .map(|m| (round.number, m.match_number, m.winning_competitor().copied()))
    });
    let Some((round, match_number, winner)) = source else {
        return;
    };
    let entrant = match winner {
        Some(c) => Entrant::Competitor(c),
        None => Entrant::WinnerOf {
            round,
            match_number,
        },
    };
    for m in structure.bracket.iter_mut().flat_map(|r| r.matches.iter_mut()) {
        for (i, feeder) in m.feeders.into_iter().enumerate() {
            if feeder != Some((round, match_number)) {
                continue;
            }
            let slot = if i == 0 { &mut m.side_1 } else { &mut m.side_2 };
            if *slot == entrant {
                continue;
            }
            if m.status != MatchStatus::NotStarted {
                warn!(
                    "Replacing an entrant of match {} which is already {}",
                    m.id, m.status
                );
            }
            *slot = entrant;
        }
    }
    debug!(
        "Bracket slot for round {} match {} now holds {:?}",
        round, match_number, entrant
    );
}

/// Knockout phase after a round robin: 1st vs 2nd, 3rd vs 4th, ...
///
/// `rankings` must already be in final order. Rankings whose competitor is
/// not in `competitors` are skipped; a trailing odd competitor gets no match.
pub fn generate_knockout_from_standings(
    tournament_id: TournamentId,
    rankings: &[PlayerRanking],
    competitors: &[Competitor],
) -> Vec<Match> {
    let ordered: Vec<Competitor> = rankings
        .iter()
        .filter_map(|r| competitors.iter().find(|c| c.id() == r.competitor_id).copied())
        .collect();
    ordered
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            Match::new(
                tournament_id,
                "Knockout",
                i as u32 + 1,
                Stage::Knockout,
                Entrant::Competitor(pair[0]),
                Entrant::Competitor(pair[1]),
            )
        })
        .collect()
}

/// A single hand-made match for a friendly tournament.
pub fn friendly_match(
    tournament_id: TournamentId,
    a: Competitor,
    b: Competitor,
    match_number: u32,
) -> Match {
    Match::new(
        tournament_id,
        "Friendly",
        match_number,
        Stage::Friendly,
        Entrant::Competitor(a),
        Entrant::Competitor(b),
    )
}

/// Structure for a format. Formats without generated play get an empty structure.
pub fn generate_structure(
    tournament_id: TournamentId,
    format: TournamentFormat,
    competitors: &[Competitor],
    group_count: usize,
) -> TournamentStructure {
    match format {
        TournamentFormat::RoundRobin | TournamentFormat::RoundRobinKnockout => {
            let id = "main";
            TournamentStructure {
                groups: vec![Group {
                    id: id.to_string(),
                    name: "Main Group".to_string(),
                    competitors: competitors.to_vec(),
                    matches: generate_round_robin(tournament_id, competitors, Some(id)),
                }],
                bracket: Vec::new(),
            }
        }
        TournamentFormat::GroupRoundRobin => TournamentStructure {
            groups: generate_group_partition(tournament_id, competitors, group_count),
            bracket: Vec::new(),
        },
        TournamentFormat::SingleElimination => TournamentStructure {
            groups: Vec::new(),
            bracket: generate_single_elimination(tournament_id, competitors),
        },
        TournamentFormat::DoubleElimination | TournamentFormat::Friendly => {
            TournamentStructure::default()
        }
    }
}

/// Check the roster and (re)generate the tournament's structure.
///
/// Replaces any previous structure and knockout phase wholesale.
pub fn generate_tournament_structure(
    tournament: &mut Tournament,
    group_count: usize,
) -> Result<(), TournamentError> {
    let required = tournament.game_type.min_players();
    if tournament.distinct_player_count() < required {
        return Err(TournamentError::NotEnoughPlayers { required });
    }
    let competitors = tournament.competitors();
    tournament.structure =
        generate_structure(tournament.id, tournament.format, &competitors, group_count);
    tournament.knockout.clear();
    tournament.friendlies.clear();
    debug!(
        "Generated {} structure for tournament {}: {} matches",
        tournament.format,
        tournament.id,
        tournament.structure.matches().count()
    );
    Ok(())
}

/// Second phase of a round robin + knockout tournament, seeded from the
/// final standings of the main group.
///
/// Every round robin match must be decided or cancelled first.
pub fn start_knockout(tournament: &mut Tournament, draw: TieDraw) -> Result<(), TournamentError> {
    if tournament.format != TournamentFormat::RoundRobinKnockout {
        return Err(TournamentError::UnsupportedFormat(tournament.format));
    }
    let open = tournament
        .structure
        .matches()
        .filter(|m| !m.status.is_decided() && m.status != MatchStatus::Cancelled)
        .count();
    if open > 0 {
        return Err(TournamentError::GroupPlayUnfinished(open));
    }
    let competitors = tournament.competitors();
    let ids: Vec<_> = competitors.iter().map(Competitor::id).collect();
    let group_matches: Vec<Match> = tournament.structure.matches().cloned().collect();
    let rankings = compute_rankings(&ids, &group_matches, draw);
    tournament.knockout = generate_knockout_from_standings(tournament.id, &rankings, &competitors);
    debug!(
        "Seeded {} knockout matches for tournament {}",
        tournament.knockout.len(),
        tournament.id
    );
    Ok(())
}

/// Add a hand-made match between two roster competitors (friendly format).
pub fn add_friendly_match(
    tournament: &mut Tournament,
    a: Uuid,
    b: Uuid,
) -> Result<MatchId, TournamentError> {
    if tournament.format != TournamentFormat::Friendly {
        return Err(TournamentError::UnsupportedFormat(tournament.format));
    }
    let competitors = tournament.competitors();
    let find = |id: Uuid| {
        competitors
            .iter()
            .find(|c| c.id() == id)
            .copied()
            .ok_or(TournamentError::PlayerNotFound(id))
    };
    let (a, b) = (find(a)?, find(b)?);
    let number = tournament.friendlies.len() as u32 + 1;
    let m = friendly_match(tournament.id, a, b, number);
    let id = m.id;
    tournament.friendlies.push(m);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::group_letter;

    #[test]
    fn group_letters_continue_past_z() {
        assert_eq!(group_letter(0), "A");
        assert_eq!(group_letter(2), "C");
        assert_eq!(group_letter(25), "Z");
        assert_eq!(group_letter(26), "AA");
        assert_eq!(group_letter(27), "AB");
    }
}

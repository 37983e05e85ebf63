//! Integration tests for the tournament aggregate: roster checks, regeneration,
//! recording points, knockout seeding and friendlies.

use table_tennis_tournament::logic::group_rankings;
use table_tennis_tournament::{
    add_friendly_match, generate_tournament_structure, record_point, reset_match_set,
    start_knockout, tournament_rankings, Entrant, GameType, MatchId, MatchStatus, Player, ScoreUpdate, Side,
    Stage, TieDraw, Tournament, TournamentError, TournamentFormat,
};

fn tournament_with_players(n: usize, format: TournamentFormat) -> Tournament {
    let players: Vec<Player> = (0..n).map(|i| Player::new(format!("P{i}"))).collect();
    Tournament::with_players(players, format, GameType::Single)
}

/// Play a whole match in straight sets for `side`.
fn play_match(t: &mut Tournament, id: MatchId, side: Side) -> ScoreUpdate {
    let mut last = ScoreUpdate::Ignored;
    for _ in 0..33 {
        last = record_point(t, id, side, 1).unwrap();
    }
    last
}

#[test]
fn generate_requires_enough_players() {
    let mut t = tournament_with_players(1, TournamentFormat::RoundRobin);
    assert_eq!(
        generate_tournament_structure(&mut t, 2),
        Err(TournamentError::NotEnoughPlayers { required: 2 })
    );

    // Doubles need four distinct players, i.e. two pairs.
    let mut d = Tournament::new("Doubles", TournamentFormat::RoundRobin, GameType::Double);
    let a = d.add_player("A").unwrap();
    let b = d.add_player("B").unwrap();
    let c = d.add_player("C").unwrap();
    d.add_pair(a, b, None).unwrap();
    assert_eq!(
        generate_tournament_structure(&mut d, 2),
        Err(TournamentError::NotEnoughPlayers { required: 4 })
    );
    assert_eq!(
        d.add_pair(a, c, None),
        Err(TournamentError::PlayerAlreadyPaired(a))
    );
    let e = d.add_player("E").unwrap();
    d.add_pair(c, e, Some("Loopers".into())).unwrap();
    generate_tournament_structure(&mut d, 2).unwrap();
    assert_eq!(d.matches().count(), 1);
}

#[test]
fn player_names_are_unique_ignoring_case() {
    let mut t = Tournament::new("Open", TournamentFormat::RoundRobin, GameType::Single);
    t.add_player("Lin").unwrap();
    assert_eq!(t.add_player(" lin "), Err(TournamentError::DuplicatePlayerName));
}

#[test]
fn removing_a_player_dissolves_their_pair() {
    let mut t = Tournament::new("Doubles", TournamentFormat::RoundRobin, GameType::Double);
    let a = t.add_player("A").unwrap();
    let b = t.add_player("B").unwrap();
    t.add_pair(a, b, None).unwrap();
    t.remove_player(b).unwrap();
    assert!(t.pairs.is_empty());
    assert_eq!(t.players.len(), 1);
    assert!(matches!(
        t.remove_player(b),
        Err(TournamentError::PlayerNotFound(_))
    ));
}

#[test]
fn regeneration_replaces_the_schedule() {
    let mut t = tournament_with_players(4, TournamentFormat::GroupRoundRobin);
    generate_tournament_structure(&mut t, 2).unwrap();
    let first: Vec<MatchId> = t.matches().map(|m| m.id).collect();
    assert_eq!(first.len(), 2);

    generate_tournament_structure(&mut t, 1).unwrap();
    let second: Vec<MatchId> = t.matches().map(|m| m.id).collect();
    assert_eq!(second.len(), 6);
    assert!(first.iter().all(|id| !second.contains(id)));
}

#[test]
fn bracket_winners_advance_to_the_next_round() {
    let mut t = tournament_with_players(4, TournamentFormat::SingleElimination);
    generate_tournament_structure(&mut t, 0).unwrap();
    let semi = t.structure.bracket[0].matches[1].clone();

    assert_eq!(play_match(&mut t, semi.id, Side::Two), ScoreUpdate::MatchWon(Side::Two));

    let final_match = &t.structure.bracket[1].matches[0];
    assert_eq!(final_match.stage, Stage::Final);
    assert!(matches!(final_match.side_1, Entrant::WinnerOf { .. }));
    assert_eq!(final_match.side_2, semi.side_2);
}

#[test]
fn corrected_bracket_result_replaces_the_advanced_winner() {
    let mut t = tournament_with_players(4, TournamentFormat::SingleElimination);
    generate_tournament_structure(&mut t, 0).unwrap();
    let semi = t.structure.bracket[0].matches[0].clone();

    assert_eq!(play_match(&mut t, semi.id, Side::One), ScoreUpdate::MatchWon(Side::One));
    assert_eq!(t.structure.bracket[1].matches[0].side_1, semi.side_1);

    // Umpire resets the deciding third set: the final loses its entrant again.
    reset_match_set(&mut t, semi.id).unwrap();
    let final_match = &t.structure.bracket[1].matches[0];
    assert_eq!(
        final_match.side_1,
        Entrant::WinnerOf {
            round: 1,
            match_number: 1
        }
    );

    // Side two now takes sets three to five.
    assert_eq!(play_match(&mut t, semi.id, Side::Two), ScoreUpdate::MatchWon(Side::Two));
    assert_eq!(t.structure.bracket[1].matches[0].side_1, semi.side_2);
}

#[test]
fn result_change_after_a_direct_reset_still_advances() {
    let mut t = tournament_with_players(4, TournamentFormat::SingleElimination);
    generate_tournament_structure(&mut t, 0).unwrap();
    let semi = t.structure.bracket[0].matches[0].clone();

    play_match(&mut t, semi.id, Side::One);
    table_tennis_tournament::reset_current_set(t.get_match_mut(semi.id).unwrap());
    assert_eq!(play_match(&mut t, semi.id, Side::Two), ScoreUpdate::MatchWon(Side::Two));
    assert_eq!(t.structure.bracket[1].matches[0].side_1, semi.side_2);
}

#[test]
fn bracket_match_waiting_on_entrants_cannot_be_scored() {
    let mut t = tournament_with_players(4, TournamentFormat::SingleElimination);
    generate_tournament_structure(&mut t, 0).unwrap();
    let final_id = t.structure.bracket[1].matches[0].id;

    assert_eq!(
        record_point(&mut t, final_id, Side::One, 1),
        Err(TournamentError::EntrantsUndecided(final_id))
    );
    assert_eq!(t.structure.bracket[1].matches[0].status, MatchStatus::NotStarted);
    assert!(t.structure.bracket[1].matches[0].sets.is_empty());
}

#[test]
fn unknown_match_is_an_error() {
    let mut t = tournament_with_players(2, TournamentFormat::RoundRobin);
    let id = uuid::Uuid::new_v4();
    assert_eq!(
        record_point(&mut t, id, Side::One, 1),
        Err(TournamentError::MatchNotFound(id))
    );
}

#[test]
fn knockout_is_seeded_from_round_robin_standings() {
    let mut t = tournament_with_players(4, TournamentFormat::RoundRobinKnockout);
    generate_tournament_structure(&mut t, 1).unwrap();
    assert_eq!(
        start_knockout(&mut t, TieDraw::InputOrder),
        Err(TournamentError::GroupPlayUnfinished(6))
    );
    assert!(t.knockout.is_empty());

    // Side one wins every match: P0 beats all, P1 beats P2 and P3, P2 beats P3.
    let ids: Vec<MatchId> = t.matches().map(|m| m.id).collect();
    for id in ids {
        play_match(&mut t, id, Side::One);
    }
    assert!(t.matches().all(|m| m.status == MatchStatus::Completed));

    let standings = tournament_rankings(&t, TieDraw::InputOrder);
    let expected: Vec<_> = t.players.iter().map(|p| p.id).collect();
    let order: Vec<_> = standings.iter().map(|r| r.competitor_id).collect();
    assert_eq!(order, expected);

    start_knockout(&mut t, TieDraw::InputOrder).unwrap();
    assert_eq!(t.knockout.len(), 2);
    let first = &t.knockout[0];
    assert_eq!(first.side_1.competitor().unwrap().id(), t.players[0].id);
    assert_eq!(first.side_2.competitor().unwrap().id(), t.players[1].id);

    // Knockout matches can be scored through the tournament too.
    let knockout_id = first.id;
    assert_eq!(
        record_point(&mut t, knockout_id, Side::One, 1),
        Ok(ScoreUpdate::Updated)
    );
}

#[test]
fn knockout_needs_the_round_robin_knockout_format() {
    let mut t = tournament_with_players(4, TournamentFormat::RoundRobin);
    assert_eq!(
        start_knockout(&mut t, TieDraw::InputOrder),
        Err(TournamentError::UnsupportedFormat(TournamentFormat::RoundRobin))
    );
}

#[test]
fn friendlies_are_added_by_hand() {
    let mut t = tournament_with_players(3, TournamentFormat::Friendly);
    generate_tournament_structure(&mut t, 1).unwrap();
    assert_eq!(t.matches().count(), 0);

    let (a, b) = (t.players[0].id, t.players[2].id);
    let id = add_friendly_match(&mut t, a, b).unwrap();
    assert_eq!(t.matches().count(), 1);
    assert_eq!(t.friendlies[0].stage, Stage::Friendly);
    assert_eq!(play_match(&mut t, id, Side::One), ScoreUpdate::MatchWon(Side::One));

    let standings = tournament_rankings(&t, TieDraw::InputOrder);
    assert_eq!(standings[0].competitor_id, a);
    assert_eq!(standings[0].points, 3);
}

#[test]
fn each_group_has_its_own_standings() {
    let mut t = tournament_with_players(4, TournamentFormat::GroupRoundRobin);
    generate_tournament_structure(&mut t, 2).unwrap();
    let group_a = t.structure.groups[0].matches[0].id;
    play_match(&mut t, group_a, Side::Two);

    let standings = group_rankings(&t.structure.groups[0], TieDraw::InputOrder);
    assert_eq!(standings.len(), 2);
    assert_eq!(standings[0].competitor_id, t.players[1].id);
    assert_eq!(standings[0].position, 1);
    assert_eq!(standings[1].stats.matches_lost, 1);

    // Group B has not played yet: both on zero, input order kept.
    let other = group_rankings(&t.structure.groups[1], TieDraw::InputOrder);
    assert_eq!(other[0].competitor_id, t.players[2].id);
    assert_eq!(other[0].points, 0);
}

//! Integration tests for CSV roster import.

use table_tennis_tournament::{
    generate_tournament_structure, load_roster, GameType, TournamentError, TournamentFormat,
};

#[test]
fn singles_roster_keeps_file_order() {
    let csv = "name\nLin\nMa\nZhang\n";
    let t = load_roster(csv.as_bytes(), "Club night", TournamentFormat::RoundRobin).unwrap();
    assert_eq!(t.game_type, GameType::Single);
    let names: Vec<&str> = t.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Lin", "Ma", "Zhang"]);
    assert_eq!(t.title, "Club night");
}

#[test]
fn partner_column_makes_a_doubles_roster() {
    let csv = "name,partner,team_name\nAna,Bo,Spin Doctors\nCy,Di,\n";
    let mut t = load_roster(csv.as_bytes(), "Doubles", TournamentFormat::RoundRobin).unwrap();
    assert_eq!(t.game_type, GameType::Double);
    assert_eq!(t.players.len(), 4);
    assert_eq!(t.pairs.len(), 2);
    assert_eq!(t.pairs[0].display_name(), "Spin Doctors");
    assert_eq!(t.pairs[1].display_name(), "Cy / Di");

    generate_tournament_structure(&mut t, 1).unwrap();
    assert_eq!(t.matches().count(), 1);
    assert_eq!(t.display_name(t.pairs[1].id).as_deref(), Some("Cy / Di"));
}

#[test]
fn doubles_rows_need_a_partner() {
    let csv = "name,partner,team_name\nAna,Bo,\nCy,,\n";
    let err = load_roster(csv.as_bytes(), "Doubles", TournamentFormat::RoundRobin).unwrap_err();
    assert!(matches!(err, TournamentError::Roster(_)));
}

#[test]
fn duplicate_names_are_rejected() {
    let csv = "name\nLin\nlin\n";
    assert_eq!(
        load_roster(csv.as_bytes(), "Open", TournamentFormat::RoundRobin).unwrap_err(),
        TournamentError::DuplicatePlayerName
    );
}

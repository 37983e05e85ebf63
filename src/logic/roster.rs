//! Roster import from CSV.
//!
//! Header row: `name,partner,team_name`. `partner` and `team_name` may be
//! empty. A roster where any row names a partner is a doubles roster and
//! every row must then name one.

use crate::models::{GameType, Tournament, TournamentError, TournamentFormat};
use log::{info, warn};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    #[serde(default)]
    partner: Option<String>,
    #[serde(default)]
    team_name: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl From<csv::Error> for TournamentError {
    fn from(e: csv::Error) -> Self {
        TournamentError::Roster(e.to_string())
    }
}

/// Read a roster into a new tournament of the given format.
///
/// Player names must be unique (case-insensitive), so a doubles roster
/// cannot list the same player in two pairs.
pub fn load_roster<R: Read>(
    reader: R,
    title: impl Into<String>,
    format: TournamentFormat,
) -> Result<Tournament, TournamentError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in rdr.deserialize::<RosterRow>() {
        let row = record?;
        if row.name.trim().is_empty() {
            warn!("Skipping roster row without a name");
            continue;
        }
        rows.push(RosterRow {
            name: row.name,
            partner: non_empty(row.partner),
            team_name: non_empty(row.team_name),
        });
    }

    let game_type = if rows.iter().any(|r| r.partner.is_some()) {
        GameType::Double
    } else {
        GameType::Single
    };
    let mut tournament = Tournament::new(title, format, game_type);

    for row in rows {
        let first = tournament.add_player(&row.name)?;
        if game_type == GameType::Double {
            let partner = row.partner.ok_or_else(|| {
                TournamentError::Roster(format!("{} has no doubles partner", row.name))
            })?;
            let second = tournament.add_player(partner)?;
            tournament.add_pair(first, second, row.team_name)?;
        }
    }

    info!(
        "Loaded roster: {} players, {} pairs ({:?})",
        tournament.players.len(),
        tournament.pairs.len(),
        game_type
    );
    Ok(tournament)
}

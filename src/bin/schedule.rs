//! Command line host: load a CSV roster, generate the schedule, print it as JSON.
//! Run with: cargo run --bin schedule -- roster.csv
//! Configure with env: TOURNAMENT_FORMAT (e.g. GROUP_ROUND_ROBIN), GROUP_COUNT (e.g. 4),
//! TOURNAMENT_TITLE.

use std::fs::File;
use std::process::ExitCode;
use table_tennis_tournament::{
    generate_tournament_structure, load_roster, Tournament, TournamentError, TournamentFormat,
};

fn default_format() -> TournamentFormat {
    TournamentFormat::RoundRobin
}

fn default_group_count() -> usize {
    2
}

fn default_title() -> String {
    "Tournament".to_string()
}

/// Settings read from the environment.
struct Config {
    format: TournamentFormat,
    group_count: usize,
    title: String,
}

impl Config {
    fn from_env() -> Result<Self, TournamentError> {
        let format = match std::env::var("TOURNAMENT_FORMAT") {
            Ok(name) => name.parse()?,
            Err(_) => default_format(),
        };
        let group_count = std::env::var("GROUP_COUNT")
            .ok()
            .and_then(|n| n.parse().ok())
            .unwrap_or_else(default_group_count);
        let title = std::env::var("TOURNAMENT_TITLE").unwrap_or_else(|_| default_title());
        Ok(Self {
            format,
            group_count,
            title,
        })
    }
}

fn run(path: &str) -> Result<Tournament, TournamentError> {
    let config = Config::from_env()?;
    log::info!(
        "Generating {} schedule from {} ({} groups)",
        config.format,
        path,
        config.group_count
    );
    let file = File::open(path).map_err(|e| TournamentError::Roster(format!("{}: {}", path, e)))?;
    let mut tournament = load_roster(file, config.title, config.format)?;
    generate_tournament_structure(&mut tournament, config.group_count)?;
    Ok(tournament)
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: schedule <roster.csv>");
        return ExitCode::FAILURE;
    };

    let tournament = match run(&path) {
        Ok(t) => t,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&tournament) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Could not serialize tournament: {}", e);
            ExitCode::FAILURE
        }
    }
}

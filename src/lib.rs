pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod identity;
pub mod league;
pub mod parsers;
pub mod report;
pub mod standings;
pub mod storage;
pub mod services;

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::config::AppConfig;
use crate::domain::BatchTags;
use crate::report::OutputFormat;
use crate::services::{IngestionService, StandingsService};
use crate::standings::AggregationMode;

pub fn interpret() -> Cli {
    Cli::parse()
}

pub fn handle_league_create(config: &AppConfig, name: &str) -> Result<()> {
    let mut store = storage::open_store(&config.storage)?;
    let name = league::create_league(store.as_mut(), name)?;
    println!("Created league '{}'", name);
    Ok(())
}

pub fn handle_league_list(config: &AppConfig) -> Result<()> {
    let store = storage::open_store(&config.storage)?;
    let leagues = league::list_leagues(store.as_ref())?;
    report::write_leagues(&mut io::stdout().lock(), &leagues)
}

pub fn handle_ingest(
    config: &AppConfig,
    league: &str,
    tournament: &str,
    date: Option<&str>,
    file: &Path,
) -> Result<()> {
    let mut store = storage::open_store(&config.storage)?;
    let tags = BatchTags {
        league: league.to_string(),
        tournament: tournament.to_string(),
        date: date
            .map(str::to_string)
            .unwrap_or_else(|| chrono::Local::now().date_naive().to_string()),
    };

    let mut service = IngestionService::new(store.as_mut(), &config.standings);
    let summary = service.run(file, tags)?;

    println!(
        "Added {} rows ({} players) to '{}'; {} players in standings",
        summary.rows, summary.players, league, summary.standings_size
    );
    if summary.merged_rows > 0 {
        println!("Merged {} rows onto token identities", summary.merged_rows);
    }
    if summary.coerced_points > 0 {
        println!("Counted {} rows with invalid points as 0", summary.coerced_points);
    }
    Ok(())
}

pub fn handle_standings(
    config: &AppConfig,
    league: &str,
    mode: AggregationMode,
    format: OutputFormat,
) -> Result<()> {
    let store = storage::open_store(&config.storage)?;
    let service = StandingsService::new(store.as_ref(), &config.standings);
    let standings = service.compute(league, mode)?;

    report::write_standings(&mut io::stdout().lock(), &standings, format)
}

pub fn handle_normalize(file: &Path, format: OutputFormat) -> Result<()> {
    let rows = parsers::read_results_file(file, &BatchTags::default())?;
    let normalized = identity::normalize(rows);

    report::write_normalized(&mut io::stdout().lock(), &normalized, format)
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    let mut stdout = io::stdout().lock();
    clap_complete::generate(shell, &mut command, name, &mut stdout);
    stdout.flush()?;
    Ok(())
}

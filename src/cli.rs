use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::config::StorageBackend;
use crate::report::OutputFormat;
use crate::standings::AggregationMode;

#[derive(Parser, Debug)]
#[command(author, version, about = "league standings tracker")]
pub struct Cli {
    /// Storage backend (overrides LEAGUE_STORAGE)
    #[arg(long, global = true, value_enum)]
    pub storage: Option<StorageBackend>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Manage leagues
    League {
        #[clap(subcommand)]
        action: LeagueAction,
    },
    /// Add one tournament's results to a league
    Ingest {
        /// League to add the results to
        #[arg(short, long)]
        league: String,
        /// Tournament name recorded with every row
        #[arg(short, long)]
        tournament: String,
        /// Tournament date (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Results CSV export
        file: PathBuf,
    },
    /// Print the ranked leaderboard of a league
    Standings {
        #[arg(short, long)]
        league: String,
        #[arg(short, long, value_enum, default_value_t = AggregationMode::Cumulative)]
        mode: AggregationMode,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Show the player identifiers assigned to a results file without storing it
    Normalize {
        file: PathBuf,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum LeagueAction {
    /// Create a new, empty league
    Create { name: String },
    /// List existing leagues
    List,
}

use anyhow::Result;

use league_standings::cli::{Cli, Command, LeagueAction};
use league_standings::config::AppConfig;
use league_standings::{
    handle_completions, handle_ingest, handle_league_create, handle_league_list,
    handle_normalize, handle_standings, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let cli = interpret();
    execute_command(&cli)
}

fn execute_command(cli: &Cli) -> Result<()> {
    let config = AppConfig::new().with_backend(cli.storage);

    match &cli.command {
        Command::League { action } => match action {
            LeagueAction::Create { name } => handle_league_create(&config, name),
            LeagueAction::List => handle_league_list(&config),
        },
        Command::Ingest {
            league,
            tournament,
            date,
            file,
        } => handle_ingest(&config, league, tournament, date.as_deref(), file),
        Command::Standings {
            league,
            mode,
            format,
        } => handle_standings(&config, league, *mode, *format),
        Command::Normalize { file, format } => handle_normalize(file, *format),
        Command::Completions { shell } => handle_completions(*shell),
    }
}

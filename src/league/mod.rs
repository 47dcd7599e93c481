use anyhow::Result;
use log::info;

use crate::domain::League;
use crate::errors::LeagueError;
use crate::storage::LeagueStore;

/// Trim a requested league name and reject blank ones
pub fn validate_league_name(name: &str) -> Result<String, LeagueError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LeagueError::BlankName);
    }
    Ok(name.to_string())
}

/// Register a new league. Blank and duplicate names leave the store untouched.
pub fn create_league(store: &mut dyn LeagueStore, name: &str) -> Result<String> {
    let name = validate_league_name(name)?;

    if store.contains_league(&name)? {
        return Err(LeagueError::Duplicate(name).into());
    }

    store.insert_league(&name)?;
    info!("Created league '{}'", name);
    Ok(name)
}

pub fn list_leagues(store: &dyn LeagueStore) -> Result<Vec<League>> {
    store.list_leagues()
}

/// Fails with `LeagueError::Unknown` unless the league exists
pub fn require_league(store: &dyn LeagueStore, name: &str) -> Result<()> {
    if store.contains_league(name)? {
        Ok(())
    } else {
        Err(LeagueError::Unknown(name.to_string()).into())
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rusqlite::{Connection, TransactionBehavior};

use super::connection::{create_pool, get_connection, DbPool};
use super::models::DbLeague;
use super::{leagues, results, setup, standings};
use crate::domain::{League, LeagueTables};
use crate::errors::LeagueError;
use crate::storage::LeagueStore;

/// Leagues kept in one SQLite database
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn open(database_path: &Path) -> Result<Self> {
        let pool = create_pool(database_path)?;
        let conn = get_connection(&pool)?;
        setup::ensure_schema(&conn)?;

        info!("Using league database {}", database_path.display());
        Ok(Self { pool })
    }
}

impl LeagueStore for SqliteStore {
    fn list_leagues(&self) -> Result<Vec<League>> {
        let conn = get_connection(&self.pool)?;
        Ok(leagues::list_all(&conn)?
            .into_iter()
            .map(|l| League {
                name: l.name,
                created_at: l.created_at,
            })
            .collect())
    }

    fn insert_league(&mut self, name: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to start league transaction")?;

        leagues::insert_league(&tx, name)?;
        tx.commit().context("Failed to commit new league")
    }

    fn load(&self, league: &str) -> Result<LeagueTables> {
        let conn = get_connection(&self.pool)?;
        let league = require_league(&conn, league)?;
        load_tables(&conn, &league)
    }

    fn update(
        &mut self,
        league: &str,
        apply: &mut dyn FnMut(&mut LeagueTables) -> Result<()>,
    ) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        // IMMEDIATE takes the write lock before reading, so concurrent
        // ingestions into the same database are serialized
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to start ingestion transaction")?;

        let league_row = require_league(&tx, league)?;
        let stored = load_tables(&tx, &league_row)?;

        let mut tables = stored.clone();
        apply(&mut tables)?;

        standings::replace_for_league(&tx, league_row.id, &tables.standings)?;

        let appended = if history_extends(&stored, &tables) {
            results::append_for_league(&tx, league_row.id, stored.history.len(), &tables.history)?
        } else {
            results::replace_for_league(&tx, league_row.id, &tables.history)?
        };

        tx.commit().context("Failed to commit ingestion")?;

        info!(
            "Saved league '{}': {} standings, {} new results",
            league,
            tables.standings.len(),
            appended
        );
        Ok(())
    }

    fn contains_league(&self, name: &str) -> Result<bool> {
        let conn = get_connection(&self.pool)?;
        Ok(leagues::find_by_name(&conn, name)?.is_some())
    }
}

fn require_league(conn: &Connection, name: &str) -> Result<DbLeague> {
    leagues::find_by_name(conn, name)?
        .ok_or_else(|| LeagueError::Unknown(name.to_string()).into())
}

fn load_tables(conn: &Connection, league: &DbLeague) -> Result<LeagueTables> {
    Ok(LeagueTables {
        standings: standings::list_for_league(conn, league.id)?,
        history: results::list_for_league(conn, league.id)?,
    })
}

fn history_extends(stored: &LeagueTables, updated: &LeagueTables) -> bool {
    updated.history.len() >= stored.history.len()
        && updated.history[..stored.history.len()] == stored.history[..]
}

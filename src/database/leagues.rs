use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::DbLeague;
use crate::errors::LeagueError;

pub fn insert_league(conn: &Connection, name: &str) -> Result<DbLeague> {
    if find_by_name(conn, name)?.is_some() {
        return Err(LeagueError::Duplicate(name.to_string()).into());
    }

    let sql = "INSERT INTO leagues (name) VALUES (?1) RETURNING id, name, created_at";

    conn.query_row(sql, params![name], parse_league_row)
        .context("Failed to insert new league")
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<DbLeague>> {
    let sql = "SELECT id, name, created_at FROM leagues WHERE name = ?1";

    conn.query_row(sql, params![name], parse_league_row)
        .optional()
        .context("Failed to query league by name")
}

pub fn list_all(conn: &Connection) -> Result<Vec<DbLeague>> {
    let sql = "SELECT id, name, created_at FROM leagues ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_league_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_league_row(row: &rusqlite::Row) -> rusqlite::Result<DbLeague> {
    Ok(DbLeague {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

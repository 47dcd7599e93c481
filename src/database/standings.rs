use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::domain::StandingRecord;

pub fn list_for_league(conn: &Connection, league_id: i64) -> Result<Vec<StandingRecord>> {
    let sql = "SELECT normalized_uid, name, username, points FROM standings WHERE league_id = ?1 ORDER BY position";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![league_id], parse_standing_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load standings")?;

    Ok(rows)
}

pub fn replace_for_league(
    conn: &Connection,
    league_id: i64,
    rows: &[StandingRecord],
) -> Result<()> {
    conn.execute("DELETE FROM standings WHERE league_id = ?1", params![league_id])
        .context("Failed to clear standings")?;

    let sql = "INSERT INTO standings (league_id, position, normalized_uid, name, username, points) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
    let mut stmt = conn.prepare(sql)?;

    for (position, row) in rows.iter().enumerate() {
        stmt.execute(params![
            league_id,
            position as i64,
            row.normalized_uid,
            row.name,
            row.username,
            row.points
        ])
        .context("Failed to insert standing")?;
    }

    Ok(())
}

fn parse_standing_row(row: &rusqlite::Row) -> rusqlite::Result<StandingRecord> {
    Ok(StandingRecord {
        normalized_uid: row.get(0)?,
        name: row.get(1)?,
        username: row.get(2)?,
        points: row.get(3)?,
    })
}

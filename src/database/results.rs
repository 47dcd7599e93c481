use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::domain::HistoryRecord;

pub fn list_for_league(conn: &Connection, league_id: i64) -> Result<Vec<HistoryRecord>> {
    let sql = "SELECT l.name, r.tournament, r.date, r.normalized_uid, r.name, r.username, r.secondary_token, r.points, r.rank \
               FROM results r JOIN leagues l ON l.id = r.league_id \
               WHERE r.league_id = ?1 ORDER BY r.position";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![league_id], parse_result_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load result history")?;

    Ok(rows)
}

/// History is append-only, so only rows past the stored count are written
pub fn append_for_league(
    conn: &Connection,
    league_id: i64,
    stored: usize,
    rows: &[HistoryRecord],
) -> Result<usize> {
    let sql = "INSERT INTO results (league_id, position, tournament, date, normalized_uid, name, username, secondary_token, points, rank) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
    let mut stmt = conn.prepare(sql)?;

    let mut inserted = 0;
    for (position, row) in rows.iter().enumerate().skip(stored) {
        stmt.execute(params![
            league_id,
            position as i64,
            row.tournament,
            row.date,
            row.normalized_uid,
            row.name,
            row.username,
            row.secondary_token,
            row.points,
            row.rank
        ])
        .context("Failed to insert result")?;
        inserted += 1;
    }

    Ok(inserted)
}

pub fn replace_for_league(
    conn: &Connection,
    league_id: i64,
    rows: &[HistoryRecord],
) -> Result<usize> {
    conn.execute("DELETE FROM results WHERE league_id = ?1", params![league_id])
        .context("Failed to clear result history")?;

    append_for_league(conn, league_id, 0, rows)
}

fn parse_result_row(row: &rusqlite::Row) -> rusqlite::Result<HistoryRecord> {
    Ok(HistoryRecord {
        league: row.get(0)?,
        tournament: row.get(1)?,
        date: row.get(2)?,
        normalized_uid: row.get(3)?,
        name: row.get(4)?,
        username: row.get(5)?,
        secondary_token: row.get(6)?,
        points: row.get(7)?,
        rank: row.get(8)?,
    })
}

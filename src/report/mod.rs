use std::io::Write;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::domain::{format_points, League, NormalizedRow};
use crate::standings::RankedStanding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Debug, Serialize)]
struct StandingCsvRow<'a> {
    #[serde(rename = "Rank")]
    rank: u32,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "NormalizedUID")]
    normalized_uid: &'a str,
    #[serde(rename = "Username")]
    username: Option<&'a str>,
    #[serde(rename = "Points")]
    points: String,
    #[serde(rename = "Appearances")]
    appearances: Option<usize>,
}

#[derive(Debug, Serialize)]
struct NormalizedCsvRow<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "SecondaryToken")]
    secondary_token: Option<&'a str>,
    #[serde(rename = "PlayerUID")]
    player_uid: &'a str,
    #[serde(rename = "NormalizedUID")]
    normalized_uid: &'a str,
    #[serde(rename = "Points")]
    points: Option<&'a str>,
}

pub fn write_standings<W: Write>(
    out: &mut W,
    standings: &[RankedStanding],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => write_standings_table(out, standings),
        OutputFormat::Csv => write_csv(out, standings.iter().map(standing_csv_row)),
        OutputFormat::Json => write_json(out, &standings),
    }
}

pub fn write_normalized<W: Write>(
    out: &mut W,
    rows: &[NormalizedRow],
    format: OutputFormat,
) -> Result<()> {
    let csv_rows = rows.iter().map(normalized_csv_row);
    match format {
        OutputFormat::Table => write_normalized_table(out, rows),
        OutputFormat::Csv => write_csv(out, csv_rows),
        OutputFormat::Json => write_json(out, &csv_rows.collect::<Vec<_>>()),
    }
}

pub fn write_leagues<W: Write>(out: &mut W, leagues: &[League]) -> Result<()> {
    if leagues.is_empty() {
        writeln!(out, "No leagues yet")?;
        return Ok(());
    }

    for league in leagues {
        let created = league
            .created_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        writeln!(out, "{:<30} {}", league.name, created.dimmed())?;
    }
    Ok(())
}

fn write_standings_table<W: Write>(out: &mut W, standings: &[RankedStanding]) -> Result<()> {
    if standings.is_empty() {
        writeln!(out, "No standings yet")?;
        return Ok(());
    }

    let header = format!("{:>4}  {:<30} {:>10} {:>6}", "Rank", "Name", "Points", "Apps");
    writeln!(out, "{}", header.bold())?;

    for standing in standings {
        let entry = &standing.entry;
        let apps = entry.appearances.map(|n| n.to_string()).unwrap_or_default();
        let line = format!(
            "{:>4}  {:<30} {:>10} {:>6}",
            standing.rank,
            display_name(standing),
            format_points(entry.total_points),
            apps
        );
        let line = match standing.rank {
            1 => line.yellow().bold(),
            2 | 3 => line.cyan(),
            _ => line.normal(),
        };
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn write_normalized_table<W: Write>(out: &mut W, rows: &[NormalizedRow]) -> Result<()> {
    let header = format!("{:<24} {:<30} {:<30} {:>8}", "Name", "PlayerUID", "NormalizedUID", "Points");
    writeln!(out, "{}", header.bold())?;

    for row in rows {
        let line = format!(
            "{:<24} {:<30} {:<30} {:>8}",
            row.row.name,
            row.player_uid,
            row.normalized_uid,
            row.row.points.as_deref().unwrap_or("")
        );
        if row.player_uid != row.normalized_uid {
            writeln!(out, "{}", line.green())?;
        } else {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}

/// Name plus username when the two differ
fn display_name(standing: &RankedStanding) -> String {
    match standing.entry.username.as_deref() {
        Some(username) if username != standing.entry.name => {
            format!("{} ({})", standing.entry.name, username)
        }
        _ => standing.entry.name.clone(),
    }
}

fn standing_csv_row(standing: &RankedStanding) -> StandingCsvRow<'_> {
    StandingCsvRow {
        rank: standing.rank,
        name: &standing.entry.name,
        normalized_uid: &standing.entry.normalized_uid,
        username: standing.entry.username.as_deref(),
        points: format_points(standing.entry.total_points),
        appearances: standing.entry.appearances,
    }
}

fn normalized_csv_row(row: &NormalizedRow) -> NormalizedCsvRow<'_> {
    NormalizedCsvRow {
        name: &row.row.name,
        secondary_token: row.row.token(),
        player_uid: &row.player_uid,
        normalized_uid: &row.normalized_uid,
        points: row.row.points.as_deref(),
    }
}

fn write_csv<W: Write, T: Serialize, I: IntoIterator<Item = T>>(out: &mut W, rows: I) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row).context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to write JSON")?;
    writeln!(out)?;
    Ok(())
}

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use serde::Deserialize;

use crate::domain::{present, BatchTags, ResultRow};
use crate::errors::{parse_context, read_context};

/// One record of an uploaded tournament export. Unknown columns are ignored.
#[derive(Debug, Deserialize)]
struct UploadRecord {
    #[serde(rename = "TeamPlayers1Name", default)]
    name: Option<String>,
    #[serde(rename = "TeamPlayers1AsmoConnectId", default)]
    token: Option<String>,
    #[serde(rename = "Points", default)]
    points: Option<String>,
    #[serde(rename = "TeamPlayers1Username", default)]
    username: Option<String>,
    #[serde(rename = "TeamPlayers1DisplayName", default)]
    display_name: Option<String>,
    #[serde(rename = "Rank", default)]
    rank: Option<String>,
}

pub fn read_results_file(path: &Path, tags: &BatchTags) -> Result<Vec<ResultRow>> {
    let file = File::open(path).with_context(|| read_context(path))?;
    read_results(file, tags).with_context(|| parse_context("tournament results", path))
}

const NAME_COLUMN: &str = "TeamPlayers1Name";

/// Parse tournament results, attaching the batch tags to every row.
///
/// The name column is required. Rows with a blank name are skipped.
pub fn read_results<R: Read>(reader: R, tags: &BatchTags) -> Result<Vec<ResultRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read CSV header")?;
    if !headers.iter().any(|h| h == NAME_COLUMN) {
        bail!("Missing required column '{}'", NAME_COLUMN);
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.deserialize::<UploadRecord>().enumerate() {
        let record = record.with_context(|| format!("Malformed row {}", idx + 1))?;

        match into_result_row(record, tags) {
            Some(row) => rows.push(row),
            None => warn!("Skipping row {}: missing player name", idx + 1),
        }
    }

    debug!("Parsed {} result rows", rows.len());
    Ok(rows)
}

fn into_result_row(record: UploadRecord, tags: &BatchTags) -> Option<ResultRow> {
    let name = record.name.filter(|n| !n.trim().is_empty())?;
    let username = present(record.username.as_deref())
        .or_else(|| present(record.display_name.as_deref()))
        .map(str::to_string);

    Some(ResultRow {
        name,
        secondary_token: present(record.token.as_deref()).map(str::to_string),
        username,
        points: record.points,
        rank: parse_rank(record.rank.as_deref()),
        tags: tags.clone(),
    })
}

/// Accepts "3" and "3.0"; anything else is treated as no rank
fn parse_rank(raw: Option<&str>) -> Option<u32> {
    let text = present(raw)?;

    if let Ok(rank) = text.parse::<u32>() {
        return Some(rank);
    }

    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64)
        .map(|v| v as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> BatchTags {
        BatchTags {
            league: "Summer".to_string(),
            tournament: "Week 1".to_string(),
            date: "2024-06-01".to_string(),
        }
    }

    #[test]
    fn test_read_results() {
        let csv = "\
TeamPlayers1Name,TeamPlayers1AsmoConnectId,Points,TeamPlayers1Username,Rank,Extra
Alice,,10,alice01,2,x
Alice,X1,5,,1,y
Bob,,abc,,,z
";

        let rows = read_results(csv.as_bytes(), &tags()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "Alice");
        assert_eq!(rows[0].secondary_token, None);
        assert_eq!(rows[0].username.as_deref(), Some("alice01"));
        assert_eq!(rows[0].rank, Some(2));
        assert_eq!(rows[1].token(), Some("X1"));
        assert_eq!(rows[2].points.as_deref(), Some("abc"));
        assert_eq!(rows[2].rank, None);
        assert!(rows.iter().all(|r| r.tags == tags()));
    }

    #[test]
    fn test_username_and_display_name_together() {
        let csv = "\
TeamPlayers1Name,TeamPlayers1Username,TeamPlayers1DisplayName,Points
Alice,ali,Alice A,10
Bob,,Bobby B,4
";

        let rows = read_results(csv.as_bytes(), &tags()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].username.as_deref(), Some("ali"));
        assert_eq!(rows[1].username.as_deref(), Some("Bobby B"));
    }

    #[test]
    fn test_missing_name_column_rejected() {
        let csv = "Name,Points\nAlice,10\nBob,4\n";

        let err = read_results(csv.as_bytes(), &tags()).unwrap_err();

        assert!(err.to_string().contains("TeamPlayers1Name"));
    }

    #[test]
    fn test_name_kept_as_is() {
        let csv = "TeamPlayers1Name,Points\n Alice,10\nAlice,4\n";

        let rows = read_results(csv.as_bytes(), &tags()).unwrap();

        assert_eq!(rows[0].name, " Alice");
        assert_eq!(rows[1].name, "Alice");
    }

    #[test]
    fn test_display_name_fallback_and_missing_columns() {
        let csv = "TeamPlayers1Name,TeamPlayers1DisplayName\nCarol,Caz\n";

        let rows = read_results(csv.as_bytes(), &tags()).unwrap();

        assert_eq!(rows[0].username.as_deref(), Some("Caz"));
        assert_eq!(rows[0].points, None);
        assert_eq!(rows[0].secondary_token, None);
    }

    #[test]
    fn test_rows_without_name_are_skipped() {
        let csv = "TeamPlayers1Name,Points\n,4\n  ,2\nDan,3\n";

        let rows = read_results(csv.as_bytes(), &tags()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Dan");
    }

    #[test]
    fn test_parse_rank() {
        assert_eq!(parse_rank(Some("3")), Some(3));
        assert_eq!(parse_rank(Some("3.0")), Some(3));
        assert_eq!(parse_rank(Some("3.5")), None);
        assert_eq!(parse_rank(Some("first")), None);
        assert_eq!(parse_rank(None), None);
    }

    #[test]
    fn test_empty_upload() {
        let csv = "TeamPlayers1Name,Points\n";

        assert!(read_results(csv.as_bytes(), &tags()).unwrap().is_empty());
    }
}

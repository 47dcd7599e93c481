use log::debug;

use crate::domain::{parse_points, HistoryRecord, NormalizedRow, ParsedPoints, PointsPolicy};
use crate::errors::PointsError;

/// Normalized rows with their points resolved
#[derive(Debug, Clone, Default)]
pub struct ScoredBatch {
    pub records: Vec<HistoryRecord>,
    /// Rows whose points were present but unparseable
    pub coerced: usize,
}

/// Resolve the points of every row under the given policy.
///
/// Row numbers in errors are 1-based data rows of the batch.
pub fn score_rows(
    rows: &[NormalizedRow],
    policy: &PointsPolicy,
) -> Result<ScoredBatch, PointsError> {
    let mut batch = ScoredBatch::default();

    for (idx, normalized) in rows.iter().enumerate() {
        let row = &normalized.row;
        let raw = row.points.as_deref();

        if parse_points(raw) == ParsedPoints::Invalid {
            debug!(
                "Invalid points {:?} for '{}'",
                raw.unwrap_or_default(),
                normalized.normalized_uid
            );
            batch.coerced += 1;
        }

        let points = policy.resolve(idx + 1, raw)?;

        batch.records.push(HistoryRecord {
            league: row.tags.league.clone(),
            tournament: row.tags.tournament.clone(),
            date: row.tags.date.clone(),
            normalized_uid: normalized.normalized_uid.clone(),
            name: row.name.clone(),
            username: row.username.clone(),
            secondary_token: row.token().map(str::to_string),
            points,
            rank: row.rank,
        });
    }

    Ok(batch)
}

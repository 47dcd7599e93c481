use std::collections::BTreeMap;

use crate::domain::{HistoryRecord, StandingRecord};

use super::types::StandingEntry;

type GroupKey = (String, String, Option<String>);

/// Merge a scored batch into the stored running totals.
///
/// Rows are grouped by (NormalizedUID, name, username) and summed. The result
/// is ordered by that key and replaces the stored table.
pub fn merge(existing: Vec<StandingRecord>, batch: &[HistoryRecord]) -> Vec<StandingRecord> {
    let mut groups: BTreeMap<GroupKey, f64> = BTreeMap::new();

    for record in existing {
        let key = (record.normalized_uid, record.name, record.username);
        *groups.entry(key).or_insert(0.0) += record.points;
    }

    for record in batch {
        let key = (
            record.normalized_uid.clone(),
            record.name.clone(),
            record.username.clone(),
        );
        *groups.entry(key).or_insert(0.0) += record.points;
    }

    groups
        .into_iter()
        .map(|((normalized_uid, name, username), points)| StandingRecord {
            normalized_uid,
            name,
            username,
            points,
        })
        .collect()
}

/// Each stored row stands on its own in the cumulative leaderboard
pub fn entries(table: &[StandingRecord]) -> Vec<StandingEntry> {
    table
        .iter()
        .map(|record| StandingEntry {
            normalized_uid: record.normalized_uid.clone(),
            name: record.name.clone(),
            username: record.username.clone(),
            total_points: record.points,
            appearances: None,
        })
        .collect()
}

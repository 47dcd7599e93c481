use std::collections::BTreeMap;

use crate::domain::HistoryRecord;

use super::types::StandingEntry;

pub const DEFAULT_APPEARANCE_BONUS: f64 = 5.0;

/// Per-player totals over a league's full history.
///
/// Total = sum of points + `appearance_bonus` for every row of the player.
/// Name and username come from the player's first recorded row with one.
pub fn totals(history: &[HistoryRecord], appearance_bonus: f64) -> Vec<StandingEntry> {
    let mut groups: BTreeMap<&str, StandingEntry> = BTreeMap::new();

    for record in history {
        let entry = groups
            .entry(record.normalized_uid.as_str())
            .or_insert_with(|| StandingEntry {
                normalized_uid: record.normalized_uid.clone(),
                name: record.name.clone(),
                username: None,
                total_points: 0.0,
                appearances: Some(0),
            });

        if entry.username.is_none() {
            entry.username = record.username.clone();
        }
        entry.total_points += record.points + appearance_bonus;
        entry.appearances = entry.appearances.map(|n| n + 1);
    }

    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(uid: &str, tournament: &str, points: f64) -> HistoryRecord {
        HistoryRecord {
            league: "Winter".to_string(),
            tournament: tournament.to_string(),
            date: "2024-01-10".to_string(),
            normalized_uid: uid.to_string(),
            name: uid.split("__").next().unwrap_or(uid).to_string(),
            username: None,
            secondary_token: None,
            points,
            rank: None,
        }
    }

    #[test]
    fn test_appearance_bonus_per_row() {
        let history = vec![
            record("Bob", "T1", 10.0),
            record("Bob", "T2", 0.0),
            record("Bob", "T3", 20.0),
        ];

        let entries = totals(&history, DEFAULT_APPEARANCE_BONUS);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].total_points, 45.0);
        assert_eq!(entries[0].appearances, Some(3));
    }

    #[test]
    fn test_bonus_counts_rows_not_tournaments() {
        let history = vec![record("Amy", "T1", 1.0), record("Amy", "T1", 2.0)];

        let entries = totals(&history, DEFAULT_APPEARANCE_BONUS);

        assert_eq!(entries[0].total_points, 13.0);
    }

    #[test]
    fn test_groups_by_normalized_uid() {
        let history = vec![
            record("Alice__X1", "T1", 10.0),
            record("Bob", "T1", 4.0),
            record("Alice__X1", "T2", 5.0),
        ];

        let entries = totals(&history, 0.0);

        let uids: Vec<(&str, f64)> = entries
            .iter()
            .map(|e| (e.normalized_uid.as_str(), e.total_points))
            .collect();
        assert_eq!(uids, vec![("Alice__X1", 15.0), ("Bob", 4.0)]);
    }

    #[test]
    fn test_empty_history() {
        assert!(totals(&[], DEFAULT_APPEARANCE_BONUS).is_empty());
    }
}

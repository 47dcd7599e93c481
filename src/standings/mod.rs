pub mod cumulative;
pub mod ranking;
pub mod scoring;
pub mod snapshot;
pub mod types;

pub use ranking::rank;
pub use scoring::{score_rows, ScoredBatch};
pub use types::{AggregationMode, RankedStanding, StandingEntry};

use crate::domain::LeagueTables;
use crate::identity::normalize_history;

/// Compute the ranked leaderboard of one league
pub fn aggregate(
    mode: AggregationMode,
    tables: &LeagueTables,
    appearance_bonus: f64,
) -> Vec<RankedStanding> {
    let entries = match mode {
        AggregationMode::Cumulative => cumulative::entries(&tables.standings),
        AggregationMode::Snapshot => {
            let mut history = tables.history.clone();
            normalize_history(&mut history);
            snapshot::totals(&history, appearance_bonus)
        }
    };

    rank(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BatchTags, PointsPolicy, ResultRow};
    use crate::identity::normalize;

    fn ingest(tables: &mut LeagueTables, tournament: &str, rows: Vec<ResultRow>) {
        let tags = BatchTags {
            league: "Open".to_string(),
            tournament: tournament.to_string(),
            date: "2024-05-01".to_string(),
        };
        let rows = rows.into_iter().map(|r| r.with_tags(tags.clone())).collect();
        let batch = score_rows(&normalize(rows), &PointsPolicy::default()).unwrap();

        tables.standings = cumulative::merge(std::mem::take(&mut tables.standings), &batch.records);
        tables.history.extend(batch.records);
    }

    #[test]
    fn test_cumulative_leaderboard() {
        let mut tables = LeagueTables::default();
        ingest(
            &mut tables,
            "T1",
            vec![
                ResultRow::new("Alice").with_points("10"),
                ResultRow::new("Alice").with_token("X1").with_points("5"),
                ResultRow::new("Bob").with_points("15"),
                ResultRow::new("Carol").with_points("3"),
            ],
        );

        let standings = aggregate(AggregationMode::Cumulative, &tables, 5.0);

        let rows: Vec<(u32, &str, f64)> = standings
            .iter()
            .map(|s| (s.rank, s.entry.normalized_uid.as_str(), s.entry.total_points))
            .collect();
        assert_eq!(
            rows,
            vec![(1, "Alice__X1", 15.0), (1, "Bob", 15.0), (3, "Carol", 3.0)]
        );
    }

    #[test]
    fn test_snapshot_leaderboard() {
        let mut tables = LeagueTables::default();
        ingest(&mut tables, "T1", vec![ResultRow::new("Bob").with_points("10")]);
        ingest(&mut tables, "T2", vec![ResultRow::new("Bob").with_points("0")]);
        ingest(
            &mut tables,
            "T3",
            vec![
                ResultRow::new("Bob").with_points("20"),
                ResultRow::new("Dan").with_points("40"),
            ],
        );

        let standings = aggregate(AggregationMode::Snapshot, &tables, 5.0);

        assert_eq!(standings[0].entry.name, "Bob");
        assert_eq!(standings[0].entry.total_points, 45.0);
        assert_eq!(standings[1].entry.total_points, 45.0);
        assert_eq!(standings[1].rank, 1);
    }

    #[test]
    fn test_snapshot_merges_identities_across_tournaments() {
        let mut tables = LeagueTables::default();
        ingest(&mut tables, "T1", vec![ResultRow::new("Alice").with_points("10")]);
        ingest(
            &mut tables,
            "T2",
            vec![ResultRow::new("Alice").with_token("X1").with_points("5")],
        );

        let snapshot = aggregate(AggregationMode::Snapshot, &tables, 5.0);
        let cumulative = aggregate(AggregationMode::Cumulative, &tables, 5.0);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].entry.normalized_uid, "Alice__X1");
        assert_eq!(snapshot[0].entry.total_points, 25.0);
        // Cumulative totals were normalized per batch
        assert_eq!(cumulative.len(), 2);
    }

    #[test]
    fn test_empty_tables() {
        let tables = LeagueTables::default();

        assert!(aggregate(AggregationMode::Cumulative, &tables, 5.0).is_empty());
        assert!(aggregate(AggregationMode::Snapshot, &tables, 5.0).is_empty());
    }
}

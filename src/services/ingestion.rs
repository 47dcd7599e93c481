use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Result};
use log::info;

use crate::config::StandingsSettings;
use crate::domain::{BatchTags, PointsPolicy, ResultRow};
use crate::identity;
use crate::league;
use crate::parsers::read_results_file;
use crate::standings::{cumulative, score_rows};
use crate::storage::LeagueStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionSummary {
    pub rows: usize,
    pub players: usize,
    /// Rows whose UID was folded onto a token-bearing UID
    pub merged_rows: usize,
    pub coerced_points: usize,
    pub standings_size: usize,
}

pub struct IngestionService<'a> {
    store: &'a mut dyn LeagueStore,
    policy: PointsPolicy,
}

impl<'a> IngestionService<'a> {
    pub fn new(store: &'a mut dyn LeagueStore, settings: &StandingsSettings) -> Self {
        Self {
            store,
            policy: settings.points_policy(),
        }
    }

    pub fn run(&mut self, upload: &Path, tags: BatchTags) -> Result<IngestionSummary> {
        info!("=== Ingesting {} into '{}' ===", upload.display(), tags.league);

        // Step 1: Check the target before touching the upload
        self.check_tags(&tags)?;

        // Step 2: Parse the upload
        let rows = read_results_file(upload, &tags)?;
        info!("  → Parsed {} result rows", rows.len());

        // Step 3: Normalize, score and merge
        let summary = self.ingest_rows(&tags.league, rows)?;

        info!("=== Ingestion Complete ===");
        Ok(summary)
    }

    /// Normalize one batch and merge it into the league in a single update.
    /// The store rejects unknown leagues.
    pub fn ingest_rows(&mut self, league: &str, rows: Vec<ResultRow>) -> Result<IngestionSummary> {
        let normalized = identity::normalize(rows);
        let merged_rows = normalized
            .iter()
            .filter(|r| r.player_uid != r.normalized_uid)
            .count();
        let players = normalized
            .iter()
            .map(|r| r.normalized_uid.as_str())
            .collect::<HashSet<_>>()
            .len();
        info!("  → {} players, {} rows merged onto token identities", players, merged_rows);

        let batch = score_rows(&normalized, &self.policy)?;
        if batch.coerced > 0 {
            info!("  → {} rows with invalid points counted as 0", batch.coerced);
        }

        let mut standings_size = 0;
        self.store.update(league, &mut |tables| {
            let existing = std::mem::take(&mut tables.standings);
            tables.standings = cumulative::merge(existing, &batch.records);
            tables.history.extend(batch.records.iter().cloned());
            standings_size = tables.standings.len();
            Ok(())
        })?;
        info!("  → League '{}' now has {} standings rows", league, standings_size);

        Ok(IngestionSummary {
            rows: normalized.len(),
            players,
            merged_rows,
            coerced_points: batch.coerced,
            standings_size,
        })
    }

    fn check_tags(&self, tags: &BatchTags) -> Result<()> {
        if tags.tournament.trim().is_empty() {
            bail!("Tournament name must not be empty");
        }
        league::require_league(&*self.store, &tags.league)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{LeagueError, PointsError};
    use crate::storage::FlatFileStore;

    fn setup() -> (tempfile::TempDir, FlatFileStore) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FlatFileStore::open(dir.path()).unwrap();
        league::create_league(&mut store, "Spring").unwrap();
        (dir, store)
    }

    fn tags(tournament: &str) -> BatchTags {
        BatchTags {
            league: "Spring".to_string(),
            tournament: tournament.to_string(),
            date: "2024-03-01".to_string(),
        }
    }

    #[test]
    fn test_ingest_rows() {
        let (_dir, mut store) = setup();
        let mut service = IngestionService::new(&mut store, &StandingsSettings::default());

        let summary = service
            .ingest_rows(
                "Spring",
                vec![
                    ResultRow::new("Alice").with_points("10").with_tags(tags("T1")),
                    ResultRow::new("Alice").with_token("X1").with_points("5").with_tags(tags("T1")),
                    ResultRow::new("Bob").with_points("DNS").with_tags(tags("T1")),
                ],
            )
            .unwrap();

        assert_eq!(
            summary,
            IngestionSummary {
                rows: 3,
                players: 2,
                merged_rows: 1,
                coerced_points: 1,
                standings_size: 2,
            }
        );

        let tables = store.load("Spring").unwrap();
        assert_eq!(tables.history.len(), 3);
        assert_eq!(tables.standings[0].normalized_uid, "Alice__X1");
        assert_eq!(tables.standings[0].points, 15.0);
    }

    #[test]
    fn test_strict_policy_rejects_whole_batch() {
        let (_dir, mut store) = setup();
        let settings = StandingsSettings {
            coerce_invalid_points_to_zero: false,
            ..StandingsSettings::default()
        };
        let mut service = IngestionService::new(&mut store, &settings);

        let err = service
            .ingest_rows(
                "Spring",
                vec![
                    ResultRow::new("Alice").with_points("10"),
                    ResultRow::new("Bob").with_points("DNS"),
                ],
            )
            .unwrap_err();

        assert!(err.downcast_ref::<PointsError>().is_some());
        assert!(store.load("Spring").unwrap().history.is_empty());
    }

    #[test]
    fn test_unknown_league_rejected() {
        let (_dir, mut store) = setup();
        let mut service = IngestionService::new(&mut store, &StandingsSettings::default());

        let err = service
            .ingest_rows("Winter", vec![ResultRow::new("Alice")])
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<LeagueError>(),
            Some(&LeagueError::Unknown("Winter".to_string()))
        );
    }

    #[test]
    fn test_run_reads_upload() {
        let (dir, mut store) = setup();
        let upload = dir.path().join("week1.csv");
        std::fs::write(
            &upload,
            "TeamPlayers1Name,TeamPlayers1AsmoConnectId,Points\nAlice,,10\nAlice,X1,5\n",
        )
        .unwrap();
        let mut service = IngestionService::new(&mut store, &StandingsSettings::default());

        let summary = service.run(&upload, tags("Week 1")).unwrap();

        assert_eq!(summary.rows, 2);
        let history = store.load("Spring").unwrap().history;
        assert!(history.iter().all(|r| r.tournament == "Week 1"));
    }

    #[test]
    fn test_run_rejects_unknown_league_before_parsing() {
        let (dir, mut store) = setup();
        let mut service = IngestionService::new(&mut store, &StandingsSettings::default());
        let tags = BatchTags {
            league: "Winter".to_string(),
            ..tags("Week 1")
        };

        let err = service.run(&dir.path().join("missing.csv"), tags).unwrap_err();

        assert_eq!(
            err.downcast_ref::<LeagueError>(),
            Some(&LeagueError::Unknown("Winter".to_string()))
        );
    }

    #[test]
    fn test_blank_tournament_rejected() {
        let (dir, mut store) = setup();
        let mut service = IngestionService::new(&mut store, &StandingsSettings::default());

        assert!(service.run(&dir.path().join("missing.csv"), tags(" ")).is_err());
    }
}

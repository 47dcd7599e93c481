use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::{League, LeagueTables};
use crate::errors::{parse_context, read_context, write_context, LeagueError};

use super::lock::LockFile;
use super::LeagueStore;

const REGISTRY_FILE: &str = "leagues.json";
const REGISTRY_LOCK: &str = "leagues.lock";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistryEntry {
    name: String,
    slug: String,
    created_at: NaiveDateTime,
}

/// Leagues kept as CSV files in one directory
///
/// ```text
/// leagues.json              league names and their file stems
/// <slug>_standings.csv      cumulative table
/// <slug>_results.csv        result history
/// ```
pub struct FlatFileStore {
    data_dir: PathBuf,
}

impl FlatFileStore {
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir).context("Failed to create league data directory")?;
        Ok(Self { data_dir })
    }

    fn read_registry(&self) -> Result<Vec<RegistryEntry>> {
        let path = self.data_dir.join(REGISTRY_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&path).with_context(|| read_context(&path))?;
        serde_json::from_str(&json).with_context(|| parse_context("league registry", &path))
    }

    fn write_registry(&self, entries: &[RegistryEntry]) -> Result<()> {
        let path = self.data_dir.join(REGISTRY_FILE);
        let json = serde_json::to_string_pretty(entries)?;
        write_atomically(&path, json.as_bytes())
    }

    fn find_entry(&self, league: &str) -> Result<RegistryEntry> {
        self.read_registry()?
            .into_iter()
            .find(|e| e.name == league)
            .ok_or_else(|| LeagueError::Unknown(league.to_string()).into())
    }

    fn standings_path(&self, slug: &str) -> PathBuf {
        self.data_dir.join(format!("{}_standings.csv", slug))
    }

    fn results_path(&self, slug: &str) -> PathBuf {
        self.data_dir.join(format!("{}_results.csv", slug))
    }

    fn lock_path(&self, slug: &str) -> PathBuf {
        self.data_dir.join(format!("{}.lock", slug))
    }

    fn load_entry(&self, entry: &RegistryEntry) -> Result<LeagueTables> {
        Ok(LeagueTables {
            standings: read_csv(&self.standings_path(&entry.slug))?,
            history: read_csv(&self.results_path(&entry.slug))?,
        })
    }
}

impl LeagueStore for FlatFileStore {
    fn list_leagues(&self) -> Result<Vec<League>> {
        Ok(self
            .read_registry()?
            .into_iter()
            .map(|e| League {
                name: e.name,
                created_at: Some(e.created_at),
            })
            .collect())
    }

    fn insert_league(&mut self, name: &str) -> Result<()> {
        let _lock = LockFile::acquire(&self.data_dir.join(REGISTRY_LOCK))?;
        let mut entries = self.read_registry()?;

        if entries.iter().any(|e| e.name == name) {
            return Err(LeagueError::Duplicate(name.to_string()).into());
        }

        let slug = unique_slug(name, &entries);
        entries.push(RegistryEntry {
            name: name.to_string(),
            slug,
            created_at: Utc::now().naive_utc(),
        });

        self.write_registry(&entries)
    }

    fn load(&self, league: &str) -> Result<LeagueTables> {
        let entry = self.find_entry(league)?;
        self.load_entry(&entry)
    }

    fn update(
        &mut self,
        league: &str,
        apply: &mut dyn FnMut(&mut LeagueTables) -> Result<()>,
    ) -> Result<()> {
        let entry = self.find_entry(league)?;
        let _lock = LockFile::acquire(&self.lock_path(&entry.slug))?;

        let mut tables = self.load_entry(&entry)?;
        apply(&mut tables)?;

        let results = self.results_path(&entry.slug);
        let standings = self.standings_path(&entry.slug);
        let staged_results = stage_csv(&results, &tables.history)?;
        let staged_standings = stage_csv(&standings, &tables.standings)?;
        commit_pair(&staged_results, &results, &staged_standings, &standings)?;

        info!(
            "Saved league '{}' to {}",
            league,
            self.standings_path(&entry.slug).display()
        );
        Ok(())
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::new();
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() { "league".to_string() } else { slug }
}

fn unique_slug(name: &str, entries: &[RegistryEntry]) -> String {
    let base = slugify(name);
    let taken = |candidate: &str| entries.iter().any(|e| e.slug == candidate);

    if !taken(&base) {
        return base;
    }

    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path).with_context(|| read_context(path))?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .with_context(|| parse_context("league table", path))
}

/// Serialize rows into a sibling temp file and return its path
fn stage_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<PathBuf> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).with_context(|| write_context(path))?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV buffer")?;
    stage(path, &bytes)
}

fn stage(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, bytes).with_context(|| write_context(&temp_path))?;
    Ok(temp_path)
}

/// Write to a sibling temp file, then rename over the target
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = stage(path, bytes)?;
    fs::rename(&temp_path, path).with_context(|| write_context(path))
}

/// Move two staged files into place. If the second rename fails, the first
/// target is restored from a backup taken before the swap.
fn commit_pair(first_temp: &Path, first: &Path, second_temp: &Path, second: &Path) -> Result<()> {
    let backup = first.with_extension("bak");
    let had_first = first.exists();
    if had_first {
        fs::copy(first, &backup).with_context(|| write_context(&backup))?;
    }

    let result = swap_pair(first_temp, first, second_temp, second, had_first.then_some(backup.as_path()));

    for leftover in [first_temp, second_temp, backup.as_path()] {
        if leftover.exists() {
            if let Err(e) = fs::remove_file(leftover) {
                warn!("Failed to remove {}: {}", leftover.display(), e);
            }
        }
    }
    result
}

fn swap_pair(
    first_temp: &Path,
    first: &Path,
    second_temp: &Path,
    second: &Path,
    backup: Option<&Path>,
) -> Result<()> {
    fs::rename(first_temp, first).with_context(|| write_context(first))?;

    if let Err(e) = fs::rename(second_temp, second) {
        let restored = match backup {
            Some(backup) => fs::rename(backup, first),
            None => fs::remove_file(first),
        };
        if let Err(restore_err) = restored {
            warn!("Failed to restore {}: {}", first.display(), restore_err);
        }
        return Err(e).with_context(|| write_context(second));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HistoryRecord, StandingRecord};

    fn history(uid: &str, points: f64) -> HistoryRecord {
        HistoryRecord {
            league: "Club Night".to_string(),
            tournament: "T1".to_string(),
            date: "2024-02-02".to_string(),
            normalized_uid: uid.to_string(),
            name: uid.to_string(),
            username: None,
            secondary_token: None,
            points,
            rank: Some(1),
        }
    }

    #[test]
    fn test_insert_and_list_leagues() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FlatFileStore::open(dir.path()).unwrap();

        store.insert_league("Club Night").unwrap();
        store.insert_league("club-night").unwrap();

        let names: Vec<String> = store.list_leagues().unwrap().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Club Night", "club-night"]);

        let slugs: Vec<String> = store.read_registry().unwrap().into_iter().map(|e| e.slug).collect();
        assert_eq!(slugs, vec!["club-night", "club-night-2"]);
    }

    #[test]
    fn test_duplicate_league_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FlatFileStore::open(dir.path()).unwrap();

        store.insert_league("Club Night").unwrap();
        let err = store.insert_league("Club Night").unwrap_err();

        assert_eq!(
            err.downcast_ref::<LeagueError>(),
            Some(&LeagueError::Duplicate("Club Night".to_string()))
        );
    }

    #[test]
    fn test_update_round_trips_tables() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FlatFileStore::open(dir.path()).unwrap();
        store.insert_league("Club Night").unwrap();

        store
            .update("Club Night", &mut |tables| {
                tables.history.push(history("Ann", 3.0));
                tables.standings.push(StandingRecord {
                    normalized_uid: "Ann".to_string(),
                    name: "Ann".to_string(),
                    username: None,
                    points: 3.0,
                });
                Ok(())
            })
            .unwrap();

        let tables = store.load("Club Night").unwrap();
        assert_eq!(tables.history, vec![history("Ann", 3.0)]);
        assert_eq!(tables.standings.len(), 1);
        assert!(!dir.path().join("club-night.lock").exists());
    }

    #[test]
    fn test_failed_update_keeps_tables() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FlatFileStore::open(dir.path()).unwrap();
        store.insert_league("Club Night").unwrap();

        let result = store.update("Club Night", &mut |tables| {
            tables.history.push(history("Ann", 3.0));
            anyhow::bail!("merge failed")
        });

        assert!(result.is_err());
        assert!(store.load("Club Night").unwrap().history.is_empty());
    }

    #[test]
    fn test_failed_standings_write_keeps_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FlatFileStore::open(dir.path()).unwrap();
        store.insert_league("Club Night").unwrap();
        store
            .update("Club Night", &mut |tables| {
                tables.history.push(history("Ann", 3.0));
                Ok(())
            })
            .unwrap();

        let standings = dir.path().join("club-night_standings.csv");
        let result = store.update("Club Night", &mut |tables| {
            tables.history.push(history("Bob", 4.0));
            // A non-empty directory in place of the standings file blocks the rename
            fs::remove_file(&standings)?;
            fs::create_dir_all(standings.join("blocker"))?;
            Ok(())
        });
        assert!(result.is_err());

        fs::remove_dir_all(&standings).unwrap();
        let tables = store.load("Club Night").unwrap();
        assert_eq!(tables.history, vec![history("Ann", 3.0)]);
        assert!(!dir.path().join("club-night_results.bak").exists());
        assert!(!dir.path().join("club-night_results.tmp").exists());
        assert!(!dir.path().join("club-night.lock").exists());
    }

    #[test]
    fn test_unknown_league() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlatFileStore::open(dir.path()).unwrap();

        let err = store.load("Nope").unwrap_err();

        assert_eq!(
            err.downcast_ref::<LeagueError>(),
            Some(&LeagueError::Unknown("Nope".to_string()))
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Club Night"), "club-night");
        assert_eq!(slugify("  Ligue été #3 "), "ligue-été-3");
        assert_eq!(slugify("***"), "league");
    }
}

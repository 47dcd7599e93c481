use std::path::PathBuf;
use std::str::FromStr;

use log::warn;

use crate::domain::PointsPolicy;
use crate::standings::snapshot::DEFAULT_APPEARANCE_BONUS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StorageBackend {
    /// Single SQLite database
    Sqlite,
    /// CSV files in a data directory
    Files,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "files" | "csv" => Ok(StorageBackend::Files),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StandingsSettings {
    pub appearance_bonus: f64,
    pub coerce_invalid_points_to_zero: bool,
}

impl Default for StandingsSettings {
    fn default() -> Self {
        Self {
            appearance_bonus: DEFAULT_APPEARANCE_BONUS,
            coerce_invalid_points_to_zero: true,
        }
    }
}

impl StandingsSettings {
    pub fn points_policy(&self) -> PointsPolicy {
        PointsPolicy {
            coerce_invalid_points_to_zero: self.coerce_invalid_points_to_zero,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub database_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            database_path: PathBuf::from("league_standings.db"),
            data_dir: PathBuf::from("leagues"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub standings: StandingsSettings,
    pub storage: StorageSettings,
}

impl AppConfig {
    /// Defaults overridden by environment variables
    pub fn new() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("DATABASE_PATH") {
            config.storage.database_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("LEAGUE_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(backend) = parse_var(&lookup, "LEAGUE_STORAGE") {
            config.storage.backend = backend;
        }
        if let Some(bonus) = parse_var(&lookup, "LEAGUE_APPEARANCE_BONUS") {
            config.standings.appearance_bonus = bonus;
        }
        if let Some(coerce) = parse_var(&lookup, "LEAGUE_COERCE_POINTS") {
            config.standings.coerce_invalid_points_to_zero = coerce;
        }

        config
    }

    pub fn with_backend(mut self, backend: Option<StorageBackend>) -> Self {
        if let Some(backend) = backend {
            self.storage.backend = backend;
        }
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

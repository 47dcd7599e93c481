pub mod flat_file;
pub mod lock;

pub use flat_file::FlatFileStore;

use anyhow::Result;

use crate::config::settings::{StorageBackend, StorageSettings};
use crate::database::SqliteStore;
use crate::domain::{League, LeagueTables};

/// Persistence collaborator for leagues and their tables.
///
/// `update` runs load → apply → save as one critical section; a failing
/// `apply` leaves the stored tables untouched.
pub trait LeagueStore {
    fn list_leagues(&self) -> Result<Vec<League>>;

    fn insert_league(&mut self, name: &str) -> Result<()>;

    fn load(&self, league: &str) -> Result<LeagueTables>;

    fn update(
        &mut self,
        league: &str,
        apply: &mut dyn FnMut(&mut LeagueTables) -> Result<()>,
    ) -> Result<()>;

    fn contains_league(&self, name: &str) -> Result<bool> {
        Ok(self.list_leagues()?.iter().any(|l| l.name == name))
    }
}

pub fn open_store(settings: &StorageSettings) -> Result<Box<dyn LeagueStore>> {
    match settings.backend {
        StorageBackend::Sqlite => Ok(Box::new(SqliteStore::open(&settings.database_path)?)),
        StorageBackend::Files => Ok(Box::new(FlatFileStore::open(&settings.data_dir)?)),
    }
}

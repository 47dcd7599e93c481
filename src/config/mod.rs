pub mod settings;

pub use settings::{AppConfig, StandingsSettings, StorageBackend, StorageSettings};

pub mod ingestion;
pub mod standings;

pub use ingestion::{IngestionService, IngestionSummary};
pub use standings::StandingsService;

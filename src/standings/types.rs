use serde::Serialize;

/// Which aggregation a leaderboard is computed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AggregationMode {
    /// Stored running totals, updated on every ingestion
    Cumulative,
    /// Recomputed from the full result history with an appearance bonus
    Snapshot,
}

impl AggregationMode {
    pub fn as_str(&self) -> &str {
        match self {
            AggregationMode::Cumulative => "cumulative",
            AggregationMode::Snapshot => "snapshot",
        }
    }
}

/// One player's aggregated total, before ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingEntry {
    pub normalized_uid: String,
    pub name: String,
    pub username: Option<String>,
    pub total_points: f64,
    /// Only known in snapshot mode
    pub appearances: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStanding {
    pub rank: u32,
    #[serde(flatten)]
    pub entry: StandingEntry,
}

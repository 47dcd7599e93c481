use anyhow::Result;
use log::info;

use crate::config::StandingsSettings;
use crate::standings::{aggregate, AggregationMode, RankedStanding};
use crate::storage::LeagueStore;

pub struct StandingsService<'a> {
    store: &'a dyn LeagueStore,
    settings: StandingsSettings,
}

impl<'a> StandingsService<'a> {
    pub fn new(store: &'a dyn LeagueStore, settings: &StandingsSettings) -> Self {
        Self {
            store,
            settings: settings.clone(),
        }
    }

    pub fn compute(&self, league: &str, mode: AggregationMode) -> Result<Vec<RankedStanding>> {
        let tables = self.store.load(league)?;
        info!(
            "Computing {} standings for '{}' from {} stored rows and {} results",
            mode.as_str(),
            league,
            tables.standings.len(),
            tables.history.len()
        );

        Ok(aggregate(mode, &tables, self.settings.appearance_bonus))
    }
}

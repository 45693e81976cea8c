use chrono::Local;

use crate::country::CountryTable;
use crate::layout::{Layout, YearRange};
use crate::model::PlayerSighting;
use crate::scrape::Scraper;
use crate::{info_time, repository, Result};

/// Scrapes season listings and stores one shard per year.
pub struct TransferHarvester<'a, S: ?Sized> {
    countries: &'a CountryTable,
    layout: &'a Layout,
    scraper: &'a S,
}

impl<'a, S: Scraper + ?Sized> TransferHarvester<'a, S> {
    pub fn new(countries: &'a CountryTable, layout: &'a Layout, scraper: &'a S) -> Self {
        Self {
            countries,
            layout,
            scraper,
        }
    }

    /// Scrapes every season in `from_year..=to_year`, oldest first, saving
    /// `transfers/<country>/transfer_<country>_<year>.json` after each one.
    /// Returns every sighting collected.
    pub async fn harvest(
        &self,
        country_id: u32,
        from_year: i32,
        to_year: i32,
    ) -> Result<Vec<PlayerSighting>> {
        let start_time = Local::now();
        let country = self.countries.name_of(country_id)?;
        let years = YearRange::new(from_year, to_year)?;

        let mut all_players = Vec::new();
        for year in years.years() {
            let year_time = Local::now();
            info_time!("============== {country} {year} ==============");

            let players = self.scraper.scrape(country, country_id, year).await?;
            let path = self.layout.shard_path(country, year);
            repository::save(&path, &players).await?;
            info_time!(year_time, "Saved {} sightings to {}", players.len(), path.display());

            all_players.extend(players);
        }

        info_time!(start_time, "Harvested {} sightings for {country}", all_players.len());
        Ok(all_players)
    }
}

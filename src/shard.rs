//! Discovery and loading of per-year shard files.

use std::path::PathBuf;

use tokio::fs;

use crate::country::CountryTable;
use crate::layout::{shard_year, Layout, YearRange};
use crate::model::PlayerSighting;
use crate::{repository, Error, Result};

/// Every sighting found in a country's shards, plus the years the shard files cover.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub country: String,
    pub sightings: Vec<PlayerSighting>,
    pub years: YearRange,
}

pub struct ShardAggregator<'a> {
    countries: &'a CountryTable,
    layout: &'a Layout,
}

impl<'a> ShardAggregator<'a> {
    pub fn new(countries: &'a CountryTable, layout: &'a Layout) -> Self {
        Self { countries, layout }
    }

    /// Reads all shards of `country_id`, oldest year first.
    ///
    /// The year range comes from the file names, not from the seasons inside them.
    /// Any shard that fails to decode aborts the whole aggregation.
    pub async fn aggregate(&self, country_id: u32) -> Result<Aggregation> {
        let country = self.countries.name_of(country_id)?.to_string();
        let shards = self.discover(&country).await?;

        let mut years: Option<YearRange> = None;
        let mut sightings = Vec::new();
        for (year, path) in shards {
            let mut shard: Vec<PlayerSighting> = repository::load(&path).await?;
            tracing::debug!(year, sightings = shard.len(), path = %path.display(), "read shard");
            sightings.append(&mut shard);
            years = Some(match years {
                Some(range) => range.widen(year),
                None => YearRange::single(year),
            });
        }

        let years = years.ok_or_else(|| Error::NoShards(self.layout.shard_dir(&country)))?;
        Ok(Aggregation {
            country,
            sightings,
            years,
        })
    }

    /// Shard files for `country`, sorted by year. Subdirectories and files that do not
    /// follow the shard naming scheme are ignored.
    async fn discover(&self, country: &str) -> Result<Vec<(i32, PathBuf)>> {
        let dir = self.layout.shard_dir(country);
        let mut entries = fs::read_dir(&dir).await.map_err(Error::io_at(&dir))?;

        let mut shards = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(Error::io_at(&dir))? {
            let file_type = entry.file_type().await.map_err(Error::io_at(entry.path()))?;
            if !file_type.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(year) = file_name.to_str().and_then(|name| shard_year(name, country)) else {
                continue;
            };
            shards.push((year, entry.path()));
        }

        shards.sort();
        Ok(shards)
    }
}

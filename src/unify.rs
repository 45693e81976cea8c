//! Unification of a country's shards into one transfer history per player.
//!
//! Runs in two phases. The shards are only used to learn *which* players exist:
//! [`PlayerSeeds`] keeps the identity and profile fields of each player. The transfers
//! themselves are then rebuilt from the history endpoint, one player at a time, and
//! fully replace whatever the shards contained.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Local;
use serde::Serialize;

use crate::club::ClubResolver;
use crate::country::CountryTable;
use crate::fee;
use crate::history::{HistoryDocument, HistorySource};
use crate::layout::Layout;
use crate::model::{Player, PlayerSighting, Transfer};
use crate::shard::ShardAggregator;
use crate::{info_time, repository, Error, Result};

/// Profile fields of a player as first seen in the shards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSeed {
    pub player_id: u32,
    pub player_name: String,
    pub player_url: String,
    pub nationality: String,
}

/// Distinct players in first-seen order. Later sightings of an id never change its seed.
#[derive(Debug, Clone, Default)]
pub struct PlayerSeeds {
    seeds: Vec<PlayerSeed>,
}

impl PlayerSeeds {
    pub fn from_sightings(sightings: &[PlayerSighting]) -> Self {
        let mut index: HashMap<u32, usize> = HashMap::with_capacity(sightings.len());
        let mut seeds = Vec::new();
        for sighting in sightings {
            index.entry(sighting.player_id).or_insert_with(|| {
                seeds.push(PlayerSeed {
                    player_id: sighting.player_id,
                    player_name: sighting.player_name.clone(),
                    player_url: sighting.player_url.clone(),
                    nationality: sighting.nationality.clone(),
                });
                seeds.len() - 1
            });
        }
        Self { seeds }
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerSeed> {
        self.seeds.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifySummary {
    /// Sightings read from the shards, before grouping by player.
    pub total_transfers: usize,
    pub unique_players: usize,
    pub output: PathBuf,
}

pub struct HistoryUnifier<'a, H: ?Sized> {
    countries: &'a CountryTable,
    layout: &'a Layout,
    history: &'a H,
}

impl<'a, H: HistorySource + ?Sized> HistoryUnifier<'a, H> {
    pub fn new(countries: &'a CountryTable, layout: &'a Layout, history: &'a H) -> Self {
        Self {
            countries,
            layout,
            history,
        }
    }

    /// Unifies every shard of `country_id` and writes
    /// `unified_transfers/<first>_<last>/<country>.json`.
    ///
    /// Histories are fetched sequentially. The first failure aborts the run and
    /// nothing is written.
    pub async fn unify(&self, country_id: u32) -> Result<UnifySummary> {
        let start_time = Local::now();
        let country = self.countries.name_of(country_id)?;

        let aggregation = ShardAggregator::new(self.countries, self.layout)
            .aggregate(country_id)
            .await?;
        let seeds = PlayerSeeds::from_sightings(&aggregation.sightings);
        info_time!(
            "{country}: {} sightings, {} players, seasons {}..={}",
            aggregation.sightings.len(),
            seeds.len(),
            aggregation.years.first,
            aggregation.years.last
        );

        let players = self.resolve_all(&seeds).await?;

        let output = self.layout.unified_path(country, aggregation.years);
        repository::save(&output, &players).await?;
        info_time!(start_time, "Unified {country} into {}", output.display());

        Ok(UnifySummary {
            total_transfers: aggregation.sightings.len(),
            unique_players: players.len(),
            output,
        })
    }

    /// Second phase: one history request per seed, in seed order.
    pub async fn resolve_all(&self, seeds: &PlayerSeeds) -> Result<Vec<Player>> {
        let mut players = Vec::with_capacity(seeds.len());
        for seed in seeds.iter() {
            tracing::info!(
                player_id = seed.player_id,
                name = %seed.player_name,
                "fetching transfer history"
            );
            let player = self
                .resolve_player(seed)
                .await
                .map_err(Error::for_player(seed.player_id))?;
            players.push(player);
        }
        Ok(players)
    }

    async fn resolve_player(&self, seed: &PlayerSeed) -> Result<Player> {
        let document = self.history.fetch(seed.player_id).await?;
        let transfers = history_transfers(self.countries, &document)?;

        Ok(Player {
            player_id: seed.player_id,
            player_name: seed.player_name.clone(),
            player_url: seed.player_url.clone(),
            nationality: seed.nationality.clone(),
            transfers,
        })
    }
}

/// Resolves every history entry, keeping the order of the document.
pub fn history_transfers(
    countries: &CountryTable,
    document: &HistoryDocument,
) -> Result<Vec<Transfer>> {
    let clubs = ClubResolver::new(countries);
    document
        .transfers
        .iter()
        .map(|entry| -> Result<Transfer> {
            let fee_text = entry.fee.as_deref().unwrap_or_default();
            let parsed = fee::parse(fee_text);
            if parsed.degraded {
                tracing::debug!(fee = fee_text, "unreadable fee, recorded as zero");
            }

            let from = &entry.from;
            let to = &entry.to;
            Ok(Transfer {
                from: clubs.resolve(
                    from.club_name.as_deref().unwrap_or_default(),
                    from.href.as_deref().unwrap_or_default(),
                    from.country_flag.as_deref().unwrap_or_default(),
                )?,
                to: clubs.resolve(
                    to.club_name.as_deref().unwrap_or_default(),
                    to.href.as_deref().unwrap_or_default(),
                    to.country_flag.as_deref().unwrap_or_default(),
                )?,
                fee: parsed.fee,
                season: entry.season.clone().unwrap_or_default(),
            })
        })
        .collect()
}

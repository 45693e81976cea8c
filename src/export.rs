//! Flattens unified artifacts into relational CSV tables.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tokio::task::spawn_blocking;

use crate::country::CountryTable;
use crate::layout::{Layout, YearRange};
use crate::model::Player;
use crate::{info_time, repository, Error, Result};

#[derive(Debug, Serialize)]
struct PlayerRow {
    id: u32,
    country_id: u32,
}

#[derive(Debug, Serialize)]
struct TransferRow {
    id: usize,
    player_id: u32,
    club_from: u32,
    club_to: u32,
    fee_eur: f64,
    is_loan: bool,
    season: String,
}

#[derive(Debug, Clone, Serialize)]
struct ClubRow {
    id: u32,
    name: String,
    country_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSummary {
    pub players: usize,
    pub transfers: usize,
    pub clubs: usize,
    pub output: PathBuf,
}

pub struct Exporter<'a> {
    countries: &'a CountryTable,
    layout: &'a Layout,
}

impl<'a> Exporter<'a> {
    pub fn new(countries: &'a CountryTable, layout: &'a Layout) -> Self {
        Self { countries, layout }
    }

    /// Writes `players.csv`, `transfers.csv` and `clubs.csv` for every unified artifact
    /// of the year range. Unknown nationalities or club countries abort the export.
    pub async fn export(&self, years: YearRange) -> Result<ExportSummary> {
        let start_time = Local::now();
        let dir = self.layout.unified_dir(years);

        let mut players = Vec::new();
        for path in unified_files(&dir).await? {
            let mut unified: Vec<Player> = repository::load(&path).await?;
            players.append(&mut unified);
        }

        let out_dir = self.layout.export_dir();
        let tables = self.tables(&players)?;
        let summary = ExportSummary {
            players: tables.players.len(),
            transfers: tables.transfers.len(),
            clubs: tables.clubs.len(),
            output: out_dir.clone(),
        };

        spawn_blocking(move || tables.write(&out_dir)).await??;
        info_time!(
            start_time,
            "Exported {} players, {} transfers, {} clubs",
            summary.players,
            summary.transfers,
            summary.clubs
        );
        Ok(summary)
    }

    fn tables(&self, players: &[Player]) -> Result<Tables> {
        let country_id = |name: &str| {
            self.countries
                .by_name(name)
                .ok_or_else(|| Error::UnknownCountryName(name.to_string()))
        };

        let mut tables = Tables::default();
        for player in players {
            tables.players.push(PlayerRow {
                id: player.player_id,
                country_id: country_id(&player.nationality)?,
            });

            for transfer in &player.transfers {
                tables.transfers.push(TransferRow {
                    id: tables.transfers.len() + 1,
                    player_id: player.player_id,
                    club_from: transfer.from.club_id,
                    club_to: transfer.to.club_id,
                    fee_eur: transfer.fee.amount,
                    is_loan: transfer.fee.is_loan,
                    season: transfer.season.clone(),
                });

                for club in [&transfer.from, &transfer.to] {
                    tables.clubs.insert(
                        club.club_id,
                        ClubRow {
                            id: club.club_id,
                            name: club.club_name.clone(),
                            country_id: country_id(&club.country)?,
                        },
                    );
                }
            }
        }
        Ok(tables)
    }
}

#[derive(Default)]
struct Tables {
    players: Vec<PlayerRow>,
    transfers: Vec<TransferRow>,
    clubs: BTreeMap<u32, ClubRow>,
}

impl Tables {
    fn write(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir).map_err(Error::io_at(dir))?;
        write_csv(&dir.join("players.csv"), &self.players)?;
        write_csv(&dir.join("transfers.csv"), &self.transfers)?;
        write_csv(&dir.join("clubs.csv"), self.clubs.values())?;
        Ok(())
    }
}

fn write_csv<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(Error::io_at(path))?;
    Ok(())
}

async fn unified_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(Error::io_at(dir))?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(Error::io_at(dir))? {
        let path = entry.path();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "json");
        if is_json && entry.file_type().await.map_err(Error::io_at(&path))?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

// Common test utilities
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;
use transfer_scrap::{
    country::CountryTable,
    history::{HistoryDocument, HistorySource},
    layout::Layout,
    model::{Club, Fee, PlayerSighting, Transfer},
    repository,
    scrape::Scraper,
    Error, Result,
};

pub const COUNTRIES_CSV: &str = "id,name,continent\n\
                                 26,Brazil,South America\n\
                                 40,Germany,Europe\n\
                                 157,Spain,Europe\n\
                                 9,Costa Rica,North America\n";

pub const BRAZIL: u32 = 26;
pub const COSTA_RICA: u32 = 9;

pub fn countries() -> CountryTable {
    CountryTable::from_reader(COUNTRIES_CSV.as_bytes()).unwrap()
}

pub fn workspace() -> (TempDir, Layout) {
    let dir = TempDir::new().unwrap();
    let layout = Layout::new(dir.path());
    (dir, layout)
}

pub fn sighting(player_id: u32, name: &str, season: &str) -> PlayerSighting {
    PlayerSighting {
        player_id,
        player_name: name.to_string(),
        player_url: format!("https://www.transfermarkt.com/{name}/profil/spieler/{player_id}"),
        nationality: "Brazil".to_string(),
        transfer: Transfer {
            from: Club {
                club_id: 221,
                club_name: "Santos".into(),
                country: "Brazil".into(),
                continent: None,
            },
            to: Club {
                club_id: 614,
                club_name: "Flamengo".into(),
                country: "Brazil".into(),
                continent: None,
            },
            fee: Fee::new(1_000.0, false),
            season: season.to_string(),
        },
    }
}

pub async fn write_shard(layout: &Layout, country: &str, year: i32, sightings: &[PlayerSighting]) {
    repository::save(&layout.shard_path(country, year), sightings)
        .await
        .unwrap();
}

/// A history entry with flag ids from the reference table.
pub fn history_entry(
    season: &str,
    fee: &str,
    from: (&str, u32, u32),
    to: (&str, u32, u32),
) -> String {
    let club = |(name, club_id, country_id): (&str, u32, u32)| {
        format!(
            r#"{{"clubName": "{name}", "href": "/{name}/transfers/verein/{club_id}/saison_id/2020", "countryFlag": "https://tmssl.akamaized.net/images/flagge/verysmall/{country_id}.png?lm=1520611569"}}"#
        )
    };
    format!(
        r#"{{"season": "{season}", "fee": "{fee}", "date": "Jul 1, 2020", "from": {}, "to": {}}}"#,
        club(from),
        club(to)
    )
}

pub fn history(player_id: u32, entries: &[String]) -> HistoryDocument {
    let body = format!(r#"{{"transfers": [{}]}}"#, entries.join(","));
    HistoryDocument::parse(player_id, &body).unwrap()
}

/// In-memory history endpoint. Players without a document answer like a 404.
#[derive(Default)]
pub struct StubHistory {
    documents: HashMap<u32, HistoryDocument>,
    pub requests: Mutex<Vec<u32>>,
}

impl StubHistory {
    pub fn with(mut self, player_id: u32, document: HistoryDocument) -> Self {
        self.documents.insert(player_id, document);
        self
    }

    pub fn requested(&self) -> Vec<u32> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistorySource for StubHistory {
    async fn fetch(&self, player_id: u32) -> Result<HistoryDocument> {
        self.requests.lock().unwrap().push(player_id);
        self.documents
            .get(&player_id)
            .cloned()
            .ok_or_else(|| Error::HttpStatus {
                url: format!("stub://history/{player_id}"),
                status: 404,
            })
    }
}

/// In-memory listing scraper returning canned sightings per year.
#[derive(Default)]
pub struct StubScraper {
    pub by_year: HashMap<i32, Vec<PlayerSighting>>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl Scraper for StubScraper {
    async fn scrape(
        &self,
        _region: &str,
        _country_id: u32,
        year: i32,
    ) -> Result<Vec<PlayerSighting>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.by_year
            .get(&year)
            .cloned()
            .ok_or_else(|| Error::HttpStatus {
                url: format!("stub://listing/{year}"),
                status: 503,
            })
    }
}

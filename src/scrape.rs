//! Season transfer listings.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::club::ClubResolver;
use crate::country::CountryTable;
use crate::fee;
use crate::model::{season_label, PlayerSighting, Transfer};
use crate::parse::{parse_listing, ListingPage};
use crate::request::request_page;
use crate::Result;

#[async_trait]
pub trait Scraper: Send + Sync {
    /// All transfer sightings of `region`'s players in the season starting in `year`.
    async fn scrape(
        &self,
        region: &str,
        country_id: u32,
        year: i32,
    ) -> Result<Vec<PlayerSighting>>;
}

pub struct TransfermarktScraper {
    client: Client,
    countries: Arc<CountryTable>,
    site_base_url: String,
    max_pages: u32,
}

impl TransfermarktScraper {
    pub fn new(
        client: Client,
        countries: Arc<CountryTable>,
        site_base_url: impl Into<String>,
        max_pages: u32,
    ) -> Self {
        Self {
            client,
            countries,
            site_base_url: site_base_url.into().trim_end_matches('/').to_string(),
            max_pages,
        }
    }

    fn listing_url(&self, country_id: u32, year: i32, page: u32) -> String {
        format!(
            "{}/transfers/saisontransfers/statistik/top/plus/1/galerie/0?saison_id={year}&transferfenster=alle&land_id={country_id}&ausrichtung=&spielerposition_id=&altersklasse=&leihe=&page={page}",
            self.site_base_url
        )
    }

    /// Turns the rows of one page into sightings. Rows without a player link are skipped.
    pub fn sightings(&self, region: &str, year: i32, page: &ListingPage) -> Vec<PlayerSighting> {
        let clubs = ClubResolver::new(&self.countries);
        page.rows
            .iter()
            .filter_map(|row| {
                let Some(player_id) = row.player_id().filter(|_| !row.player_name.is_empty())
                else {
                    tracing::warn!(href = %row.player_href, "skipping listing row without player");
                    return None;
                };

                Some(PlayerSighting {
                    player_id,
                    player_name: row.player_name.clone(),
                    player_url: format!("{}{}", self.site_base_url, row.player_href),
                    nationality: region.to_string(),
                    transfer: Transfer {
                        from: clubs.resolve_titled(
                            &row.from.name,
                            &row.from.href,
                            &row.from.flag_title,
                        ),
                        to: clubs.resolve_titled(&row.to.name, &row.to.href, &row.to.flag_title),
                        fee: fee::normalize(&row.fee_text),
                        season: season_label(year),
                    },
                })
            })
            .collect()
    }
}

#[async_trait]
impl Scraper for TransfermarktScraper {
    /// Walks the listing pages one after another until a page comes back empty or
    /// repeats the previous page's first rank.
    async fn scrape(
        &self,
        region: &str,
        country_id: u32,
        year: i32,
    ) -> Result<Vec<PlayerSighting>> {
        let mut players = Vec::new();
        let mut last_first_rank = None;

        for page_num in 1..=self.max_pages {
            tracing::info!(region, year, page = page_num, "scraping listing page");
            let url = self.listing_url(country_id, year, page_num);
            let html = request_page(&self.client, &url).await?;
            let page = parse_listing(html).await?;

            if page.rows.is_empty() {
                tracing::info!(page = page_num, "found EMPTY page");
                break;
            }
            if page.first_rank.is_some() && page.first_rank == last_first_rank {
                tracing::info!(page = page_num, "found REPEATED page");
                break;
            }
            last_first_rank = page.first_rank;

            players.extend(self.sightings(region, year, &page));
        }

        Ok(players)
    }
}

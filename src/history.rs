//! Secondary transfer history endpoint, keyed by player id.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::request::request_page;
use crate::{Error, Result};

/// `{"transfers": [...]}` as returned by the history endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoryDocument {
    pub transfers: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub fee: Option<String>,
    #[serde(default)]
    pub from: HistoryClub,
    #[serde(default)]
    pub to: HistoryClub,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryClub {
    #[serde(default)]
    pub club_name: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub country_flag: Option<String>,
}

impl HistoryDocument {
    pub fn parse(player_id: u32, body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|source| Error::MalformedHistory { player_id, source })
    }
}

#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn fetch(&self, player_id: u32) -> Result<HistoryDocument>;
}

pub struct HttpHistorySource {
    client: Client,
    base_url: String,
}

impl HttpHistorySource {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, player_id: u32) -> String {
        format!("{}/{}", self.base_url, player_id)
    }
}

#[async_trait]
impl HistorySource for HttpHistorySource {
    async fn fetch(&self, player_id: u32) -> Result<HistoryDocument> {
        let body = request_page(&self.client, &self.url(player_id)).await?;
        HistoryDocument::parse(player_id, &body)
    }
}

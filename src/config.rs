use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::{Error, Result};

const DEFAULT_COUNTRIES_CSV: &str = "docs/csv/countries.csv";
const DEFAULT_SITE_BASE_URL: &str = "https://www.transfermarkt.com";
const DEFAULT_HISTORY_BASE_URL: &str = "https://www.transfermarkt.com/ceapi/transferHistory/list";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
const DEFAULT_MAX_PAGES: u32 = 75;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct Settings {
    pub countries_csv: PathBuf,
    /// Root under which `transfers/`, `unified_transfers/` and `docs/csv/` live.
    pub data_dir: PathBuf,
    pub site_base_url: String,
    pub history_base_url: String,
    pub user_agent: String,
    /// Listing pages requested per season at most.
    pub max_pages: u32,
    pub bind_addr: SocketAddr,
}

impl Settings {
    /// Load settings from environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let max_pages = var("MAX_PAGES", &DEFAULT_MAX_PAGES.to_string());
        let max_pages = max_pages
            .parse::<u32>()
            .map_err(|_| Error::Config(format!("MAX_PAGES must be a number, got {max_pages:?}")))?;

        let bind_addr = var("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind_addr.parse::<SocketAddr>().map_err(|_| {
            Error::Config(format!("BIND_ADDR must be host:port, got {bind_addr:?}"))
        })?;

        Ok(Self {
            countries_csv: var("COUNTRIES_CSV", DEFAULT_COUNTRIES_CSV).into(),
            data_dir: var("DATA_DIR", ".").into(),
            site_base_url: var("SITE_BASE_URL", DEFAULT_SITE_BASE_URL),
            history_base_url: var("HISTORY_BASE_URL", DEFAULT_HISTORY_BASE_URL),
            user_agent: var("USER_AGENT", DEFAULT_USER_AGENT),
            max_pages,
            bind_addr,
        })
    }
}

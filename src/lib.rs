//! Season transfer harvesting and per-player transfer history unification.
//!
//! Listings are scraped per season into shards (`transfers/<country>/...`). Unifying a
//! country reads its shards to learn which players exist and rebuilds each player's
//! transfers from the history endpoint, resolving fees, clubs, countries and continents.

mod error;
mod macros;
mod parse;
mod request;

pub mod club;
pub mod config;
pub mod country;
pub mod export;
pub mod fee;
pub mod history;
pub mod layout;
pub mod model;
pub mod process;
pub mod repository;
pub mod scrape;
pub mod server;
pub mod shard;
pub mod unify;

pub use error::{Error, Result};
pub use parse::{parse_listing_html, ClubCell, ListingPage, ListingRow};
pub use request::build_client;

//! On-disk layout of shards, unified artifacts and CSV exports.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

const SHARDS_DIR: &str = "transfers";
const UNIFIED_DIR: &str = "unified_transfers";
const EXPORT_DIR: &str = "docs/csv";

/// Makes a country name usable as a path segment: `/`, space, `\` and `:` become `_`.
pub fn sanitize_name(name: &str) -> String {
    name.replace(['/', ' ', '\\', ':'], "_")
}

/// Inclusive range of shard years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub first: i32,
    pub last: i32,
}

impl YearRange {
    pub fn new(first: i32, last: i32) -> Result<Self> {
        if first > last {
            return Err(Error::InvalidYearRange {
                from: first,
                to: last,
            });
        }
        Ok(Self { first, last })
    }

    pub fn single(year: i32) -> Self {
        Self {
            first: year,
            last: year,
        }
    }

    pub fn widen(self, year: i32) -> Self {
        Self {
            first: self.first.min(year),
            last: self.last.max(year),
        }
    }

    pub fn years(self) -> std::ops::RangeInclusive<i32> {
        self.first..=self.last
    }
}

#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn shard_dir(&self, country: &str) -> PathBuf {
        self.root.join(SHARDS_DIR).join(sanitize_name(country))
    }

    pub fn shard_path(&self, country: &str, year: i32) -> PathBuf {
        self.shard_dir(country).join(shard_file_name(country, year))
    }

    pub fn unified_dir(&self, years: YearRange) -> PathBuf {
        self.root
            .join(UNIFIED_DIR)
            .join(format!("{}_{}", years.first, years.last))
    }

    pub fn unified_path(&self, country: &str, years: YearRange) -> PathBuf {
        self.unified_dir(years)
            .join(format!("{}.json", sanitize_name(country)))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.root.join(EXPORT_DIR)
    }
}

pub fn shard_file_name(country: &str, year: i32) -> String {
    format!("transfer_{}_{}.json", sanitize_name(country), year)
}

/// Year encoded in a shard file name for `country`, or `None` if the name is not one.
/// The country part is compared case-insensitively.
pub fn shard_year(file_name: &str, country: &str) -> Option<i32> {
    let stem = file_name.strip_prefix("transfer_")?.strip_suffix(".json")?;
    let (name, year) = stem.rsplit_once('_')?;
    if name.to_lowercase() != sanitize_name(country).to_lowercase() {
        return None;
    }
    if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    year.parse().ok()
}

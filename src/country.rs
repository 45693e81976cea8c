//! Static country reference table: id ↔ name ↔ continent.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub id: u32,
    pub name: String,
    pub continent: String,
}

/// Loaded once at startup and shared read-only by every component that needs it.
#[derive(Debug, Default)]
pub struct CountryTable {
    by_id: HashMap<u32, Country>,
    by_name: HashMap<String, u32>,
}

impl CountryTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(Error::io_at(path))?;
        let table = Self::from_reader(file)?;
        tracing::info!(path = %path.display(), countries = table.len(), "loaded country table");
        Ok(table)
    }

    /// Reads `id,name,continent` rows. Short rows and rows whose id is not an integer
    /// (a header, for instance) are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut table = Self::default();
        for record in rdr.records() {
            let record = record?;
            if record.len() < 3 {
                continue;
            }
            let Ok(id) = record[0].parse::<u32>() else {
                continue;
            };
            table.insert(Country {
                id,
                name: record[1].to_string(),
                continent: record[2].to_string(),
            })?;
        }
        Ok(table)
    }

    fn insert(&mut self, country: Country) -> Result<()> {
        let key = name_key(&country.name);

        if let Some(existing) = self.by_id.get(&country.id) {
            if name_key(&existing.name) != key {
                return Err(Error::CountryConflict {
                    key: country.id.to_string(),
                    existing: existing.name.clone(),
                    incoming: country.name,
                });
            }
        }
        if let Some(existing) = self.by_name.get(&key).and_then(|id| self.by_id.get(id)) {
            if existing.continent != country.continent {
                return Err(Error::CountryConflict {
                    key: country.name,
                    existing: existing.continent.clone(),
                    incoming: country.continent,
                });
            }
        }

        self.by_name.insert(key, country.id);
        self.by_id.insert(country.id, country);
        Ok(())
    }

    pub fn by_id(&self, id: u32) -> Option<&str> {
        self.by_id.get(&id).map(|c| c.name.as_str())
    }

    pub fn by_name(&self, name: &str) -> Option<u32> {
        self.by_name.get(&name_key(name)).copied()
    }

    /// A blank continent column counts as absent.
    pub fn continent_by_name(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(&name_key(name))
            .and_then(|id| self.by_id.get(id))
            .map(|c| c.continent.as_str())
            .filter(|continent| !continent.is_empty())
    }

    /// Like [`by_id`](Self::by_id) but absence is an error.
    pub fn name_of(&self, id: u32) -> Result<&str> {
        self.by_id(id).ok_or(Error::UnknownCountryId(id))
    }

    /// Like [`continent_by_name`](Self::continent_by_name) but absence is an error.
    pub fn continent_of(&self, name: &str) -> Result<&str> {
        self.continent_by_name(name)
            .ok_or_else(|| Error::UnknownCountryName(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[inline]
fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

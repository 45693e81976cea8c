//! Builds [`Club`] references from scraped link and flag fragments.

use crate::country::CountryTable;
use crate::model::Club;
use crate::Result;

/// Path segment that precedes the numeric club id in club links,
/// e.g. `/flamengo-rio-de-janeiro/startseite/verein/614/saison_id/2023`.
const CLUB_MARKER: &str = "verein";
/// Path segment that precedes `<country id>.png` in flag image URLs.
const FLAG_MARKER: &str = "/verysmall/";

pub struct ClubResolver<'a> {
    countries: &'a CountryTable,
}

impl<'a> ClubResolver<'a> {
    pub fn new(countries: &'a CountryTable) -> Self {
        Self { countries }
    }

    /// Transfer history path: the country comes from the id embedded in the flag image
    /// URL. Both the id and the resulting name must be known to the country table.
    pub fn resolve(&self, club_name: &str, href: &str, flag_url: &str) -> Result<Club> {
        let country_id = country_id_from_flag(flag_url)
            .ok_or_else(|| crate::Error::UnrecognizedFlag(flag_url.to_string()))?;
        let country = self.countries.name_of(country_id)?;
        let continent = self.countries.continent_of(country)?;

        Ok(Club {
            club_id: club_id_from_href(href),
            club_name: club_name.trim().to_string(),
            country: country.to_string(),
            continent: Some(continent.to_string()),
        })
    }

    /// Season listing path: the country is the flag's visible title. Listing rows are
    /// only used to discover players, so an unknown title leaves the continent unset.
    pub fn resolve_titled(&self, club_name: &str, href: &str, flag_title: &str) -> Club {
        let country = flag_title.trim();
        Club {
            club_id: club_id_from_href(href),
            club_name: club_name.trim().to_string(),
            country: country.to_string(),
            continent: self
                .countries
                .continent_by_name(country)
                .map(str::to_string),
        }
    }
}

/// Leading digits of the segment after the club marker, or `0` when there are none.
pub fn club_id_from_href(href: &str) -> u32 {
    let mut segments = href.split('/');
    while let Some(segment) = segments.next() {
        if segment == CLUB_MARKER {
            return segments.next().map(leading_number).unwrap_or(0);
        }
    }
    0
}

fn leading_number(segment: &str) -> u32 {
    let digits = segment.bytes().take_while(u8::is_ascii_digit).count();
    segment[..digits].parse().unwrap_or(0)
}

pub fn country_id_from_flag(flag_url: &str) -> Option<u32> {
    let start = flag_url.find(FLAG_MARKER)? + FLAG_MARKER.len();
    let rest = &flag_url[start..];
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || !rest[digits..].starts_with(".png") {
        return None;
    }
    rest[..digits].parse().ok()
}

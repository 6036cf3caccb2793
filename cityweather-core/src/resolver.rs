//! Matching free-text city names against known weather records.

use async_trait::async_trait;
use tracing::debug;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{CityWeather, WeatherQuery, service::Cities};

/// Something that can look cities up by query, e.g. the lookup service.
#[async_trait]
pub trait CityLookup: Send + Sync {
    async fn lookup(&self, query: &WeatherQuery) -> Cities;
}

/// Case- and diacritic-insensitive city name matching.
pub struct CityNameResolver;

impl CityNameResolver {
    /// Lower-case `name`, decompose it and drop the combining marks,
    /// so "München" and "MUNCHEN" both become "munchen".
    pub fn normalize(name: &str) -> String {
        name.to_lowercase()
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .collect()
    }

    /// First city in `cities` whose normalized name equals the normalized `name`.
    pub fn find_known<'a>(name: &str, cities: &'a [CityWeather]) -> Option<&'a CityWeather> {
        let target = Self::normalize(name);
        cities.iter().find(|c| Self::normalize(&c.name) == target)
    }

    /// Match `name` against `known`, falling back to a lookup by name.
    ///
    /// `None` means the name matches neither the known cities nor anything the
    /// lookup returned.
    pub async fn resolve<L>(name: &str, known: &[CityWeather], lookup: &L) -> Option<CityWeather>
    where
        L: CityLookup + ?Sized,
    {
        if name.trim().is_empty() {
            return None;
        }

        if let Some(city) = Self::find_known(name, known) {
            debug!(city = name, id = city.id, "city matched known cities");
            return Some(city.clone());
        }

        let fetched = lookup.lookup(&WeatherQuery::city(name)).await;
        let found = Self::find_known(name, &fetched).cloned();

        match &found {
            Some(city) => debug!(city = name, id = city.id, "city matched lookup result"),
            None => debug!(city = name, candidates = fetched.len(), "city not found"),
        }

        found
    }
}

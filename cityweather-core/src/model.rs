use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidQuery;

/// One city's current weather snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityWeather {
    pub id: u64,
    pub name: String,
    /// Alpha-2 country code, empty when the provider omits it.
    pub country: String,
    pub temperature: Temperature,
    pub conditions: Vec<Condition>,
}

/// Temperatures in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub current: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Category label such as "Clouds" or "Rain".
    pub category: String,
    /// Provider icon identifier such as "04d".
    pub icon: String,
}

impl Condition {
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }
}

/// A lookup: either a city name or a coordinate pair.
///
/// The variants are open for matching; [`WeatherQuery::validate`] is what
/// rejects a blank name or non-finite coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl WeatherQuery {
    pub fn city(name: impl Into<String>) -> Self {
        WeatherQuery::City(name.into())
    }

    pub fn coordinates(lat: f64, lon: f64) -> Self {
        WeatherQuery::Coordinates { lat, lon }
    }

    pub fn validate(&self) -> Result<(), InvalidQuery> {
        match self {
            WeatherQuery::City(name) if name.trim().is_empty() => {
                Err(InvalidQuery::new("city name must not be blank"))
            }
            WeatherQuery::Coordinates { lat, lon } if !lat.is_finite() || !lon.is_finite() => {
                Err(InvalidQuery::new("coordinates must be finite numbers"))
            }
            _ => Ok(()),
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        match self {
            WeatherQuery::City(name) => CacheKey(name.to_lowercase()),
            WeatherQuery::Coordinates { lat, lon } => {
                CacheKey(format!("{},{}", unsigned_zero(*lat), unsigned_zero(*lon)))
            }
        }
    }
}

// -0.0 and 0.0 are the same meridian/parallel.
fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// Raw, unvalidated query input as it arrives from a caller or command line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryParams {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl TryFrom<QueryParams> for WeatherQuery {
    type Error = InvalidQuery;

    fn try_from(params: QueryParams) -> Result<Self, Self::Error> {
        let city = params.city.filter(|c| !c.trim().is_empty());

        let query = match (city, params.lat, params.lon) {
            (Some(city), None, None) => WeatherQuery::City(city),
            (None, Some(lat), Some(lon)) => WeatherQuery::Coordinates { lat, lon },
            (Some(_), _, _) => {
                return Err(InvalidQuery::new(
                    "a query takes either a city name or coordinates, not both",
                ));
            }
            (None, Some(_), None) | (None, None, Some(_)) => {
                return Err(InvalidQuery::new(
                    "coordinate queries need both latitude and longitude",
                ));
            }
            (None, None, None) => {
                return Err(InvalidQuery::new(
                    "a query needs a city name or a latitude/longitude pair",
                ));
            }
        };

        query.validate()?;
        Ok(query)
    }
}

/// Identity of a cache entry, derived from a [`WeatherQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

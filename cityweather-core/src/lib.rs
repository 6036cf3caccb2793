//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider and the cached lookup service on top of it
//! - City name resolution and the `cityName` route guard
//! - Shared domain models (queries, city weather records)
//!
//! It is used by `cityweather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod guard;
pub mod model;
pub mod provider;
pub mod resolver;
pub mod service;

#[cfg(test)]
mod testing;

pub use config::{Config, OpenWeatherConfig};
pub use error::{FetchError, InvalidQuery, InvalidRoute};
pub use guard::{CITY_NAME_PARAM, Navigation, Route, check_city_name};
pub use model::{CacheKey, CityWeather, Condition, QueryParams, Temperature, WeatherQuery};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use resolver::{CityLookup, CityNameResolver};
pub use service::{Cities, WeatherLookupService};

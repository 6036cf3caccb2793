//! Route guard that drops a `cityName` parameter naming no known city.

use std::fmt;

use tracing::debug;
use url::{Url, form_urlencoded};

use crate::{InvalidRoute, resolver::CityNameResolver, service::WeatherLookupService};

pub const CITY_NAME_PARAM: &str = "cityName";

// Only used to resolve relative routes; never contacted.
const ROUTE_BASE: &str = "http://route.invalid/";
const ROUTE_HOST: &str = "route.invalid";

/// A navigation target: a path plus its query parameters in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), query: Vec::new() }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Parse `/path?key=value&...`; the query part is form-urlencoded.
    ///
    /// Absolute URLs and scheme-relative `//host/...` inputs are rejected.
    pub fn parse(input: &str) -> Result<Self, InvalidRoute> {
        if !input.starts_with('/') {
            return Err(InvalidRoute::NotAPath(input.to_string()));
        }

        let url = Url::parse(ROUTE_BASE)?.join(input)?;
        if url.host_str() != Some(ROUTE_HOST) {
            return Err(InvalidRoute::NotAPath(input.to_string()));
        }

        Ok(Self {
            path: url.path().to_string(),
            query: url.query_pairs().into_owned().collect(),
        })
    }

    /// First value of the query parameter `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// The same route with every occurrence of `key` removed.
    pub fn without_param(&self, key: &str) -> Self {
        Self {
            path: self.path.clone(),
            query: self.query.iter().filter(|(k, _)| k != key).cloned().collect(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

/// What the router should do with a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    /// Navigate to `to` instead; `replace` swaps the current history entry.
    Redirect { to: Route, replace: bool },
}

/// Check the `cityName` parameter of `to`.
///
/// The name is matched against the service's last result first, then looked
/// up by name. When nothing matches, the navigation is redirected to the same
/// path without `cityName`.
pub async fn check_city_name(to: &Route, service: &WeatherLookupService) -> Navigation {
    let Some(city_name) = to.param(CITY_NAME_PARAM).filter(|name| !name.is_empty()) else {
        return Navigation::Proceed;
    };

    let known = service.last_result();

    match CityNameResolver::resolve(city_name, &known, service).await {
        Some(_) => Navigation::Proceed,
        None => {
            debug!(route = %to, "dropping unknown {CITY_NAME_PARAM}");
            Navigation::Redirect { to: to.without_param(CITY_NAME_PARAM), replace: true }
        }
    }
}

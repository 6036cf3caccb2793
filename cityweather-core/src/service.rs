//! Cached weather lookups.
//!
//! [`WeatherLookupService`] owns an in-memory cache keyed by [`CacheKey`]. A
//! lookup goes to the provider only on a cache miss; successful results are
//! stored for the lifetime of the service and never expire.
//!
//! Overlapping lookups for the same key are not deduplicated. Each call checks
//! the cache when it starts, so two calls that both start before either
//! finishes will both reach the provider, and whichever finishes last
//! overwrites the cache entry and the last result.

use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{
    CacheKey, CityWeather, Config, InvalidQuery, QueryParams, WeatherQuery,
    provider::{WeatherProvider, provider_from_config},
    resolver::CityLookup,
};

/// An immutable, shareable list of cities as returned by one lookup.
pub type Cities = Arc<[CityWeather]>;

fn no_cities() -> Cities {
    Arc::from(Vec::new())
}

struct State {
    cache: HashMap<CacheKey, Cities>,
    last_result: Cities,
    in_flight: usize,
    error: Option<String>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            cache: HashMap::new(),
            last_result: no_cities(),
            in_flight: 0,
            error: None,
        }
    }
}

/// Leaves the loading state when dropped, whichever way the fetch ends.
struct LoadingGuard<'a> {
    state: &'a Mutex<State>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

pub struct WeatherLookupService {
    provider: Box<dyn WeatherProvider>,
    state: Mutex<State>,
}

impl fmt::Debug for WeatherLookupService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("WeatherLookupService")
            .field("provider", &self.provider)
            .field("cached_keys", &state.cache.len())
            .field("in_flight", &state.in_flight)
            .field("error", &state.error)
            .finish()
    }
}

impl WeatherLookupService {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider, state: Mutex::new(State::default()) }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(provider_from_config(config)?))
    }

    /// Validate raw parameters, then look them up.
    ///
    /// Invalid parameters are rejected before the provider is contacted and
    /// without touching the loading state.
    pub async fn fetch_params(&self, params: QueryParams) -> Result<Cities, InvalidQuery> {
        let query = WeatherQuery::try_from(params)?;
        self.fetch(&query).await
    }

    /// Look up `query`, going to the provider only on a cache miss.
    ///
    /// A blank city or non-finite coordinates are rejected with
    /// [`InvalidQuery`] before the cache or the provider is consulted.
    ///
    /// A failed fetch is not returned as an error: it is logged, recorded for
    /// [`error`](Self::error) and answered with an empty list, leaving the
    /// cache and the last result as they were.
    pub async fn fetch(&self, query: &WeatherQuery) -> Result<Cities, InvalidQuery> {
        query.validate()?;
        let key = query.cache_key();

        let _loading = {
            let mut state = self.state.lock();
            if let Some(hit) = state.cache.get(&key) {
                debug!(%key, "weather cache hit");
                return Ok(Arc::clone(hit));
            }
            state.in_flight += 1;
            state.error = None;
            LoadingGuard { state: &self.state }
        };

        debug!(%key, "weather cache miss");

        match self.provider.find(query).await {
            Ok(cities) => {
                let cities: Cities = cities.into();
                debug!(%key, count = cities.len(), "caching weather result");

                let mut state = self.state.lock();
                state.cache.insert(key, Arc::clone(&cities));
                state.last_result = Arc::clone(&cities);
                Ok(cities)
            }
            Err(err) => {
                warn!(%key, error = ?err, "weather fetch failed");
                self.state.lock().error = Some(err.to_string());
                Ok(no_cities())
            }
        }
    }

    /// True while at least one fetch is waiting on the provider.
    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight > 0
    }

    /// Description of the most recent fetch failure, cleared when a new fetch starts.
    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn last_result(&self) -> Cities {
        Arc::clone(&self.state.lock().last_result)
    }

    /// The cached result for `query`, without contacting the provider.
    pub fn cached(&self, query: &WeatherQuery) -> Option<Cities> {
        self.state.lock().cache.get(&query.cache_key()).cloned()
    }

    pub fn cache_len(&self) -> usize {
        self.state.lock().cache.len()
    }
}

#[async_trait]
impl CityLookup for WeatherLookupService {
    async fn lookup(&self, query: &WeatherQuery) -> Cities {
        self.fetch(query).await.unwrap_or_else(|err| {
            warn!(error = %err, "skipping invalid lookup");
            no_cities()
        })
    }
}

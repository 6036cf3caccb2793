//! Fixtures shared by the unit tests.

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{CityWeather, Condition, FetchError, Temperature, WeatherProvider, WeatherQuery};

pub(crate) fn city(id: u64, name: &str) -> CityWeather {
    CityWeather {
        id,
        name: name.to_string(),
        country: "XX".to_string(),
        temperature: Temperature { current: 20.0, min: 15.0, max: 25.0 },
        conditions: vec![Condition { category: "Clear".into(), icon: "01d".into() }],
    }
}

/// Provider that replays queued responses and records every query it sees.
/// Once the queue is drained it answers with an empty list.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeProvider {
    responses: Arc<Mutex<VecDeque<Result<Vec<CityWeather>, FetchError>>>>,
    seen: Arc<Mutex<Vec<WeatherQuery>>>,
}

impl FakeProvider {
    pub(crate) fn respond(&self, response: Result<Vec<CityWeather>, FetchError>) -> &Self {
        self.responses.lock().push_back(response);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.seen.lock().len()
    }

    pub(crate) fn seen(&self) -> Vec<WeatherQuery> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn find(&self, query: &WeatherQuery) -> Result<Vec<CityWeather>, FetchError> {
        self.seen.lock().push(query.clone());
        let next = self.responses.lock().pop_front();
        next.unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Provider whose calls stay pending until the test releases them one by one.
#[derive(Debug, Clone, Default)]
pub(crate) struct GatedProvider {
    calls: Arc<AtomicUsize>,
    gates: Arc<Mutex<VecDeque<tokio::sync::oneshot::Receiver<Vec<CityWeather>>>>>,
}

impl GatedProvider {
    /// Queue a gate for the next call; sending on the returned handle completes it.
    pub(crate) fn gate(&self) -> tokio::sync::oneshot::Sender<Vec<CityWeather>> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.gates.lock().push_back(rx);
        tx
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for GatedProvider {
    async fn find(&self, _query: &WeatherQuery) -> Result<Vec<CityWeather>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().pop_front();
        match gate {
            Some(rx) => Ok(rx.await.unwrap_or_default()),
            None => Ok(Vec::new()),
        }
    }
}

pub(crate) fn status_error() -> FetchError {
    FetchError::Status {
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        body: "upstream down".to_string(),
    }
}

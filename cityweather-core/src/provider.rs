use std::{fmt::Debug, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;

use crate::{CityWeather, Config, FetchError, WeatherQuery, provider::openweather::OpenWeatherProvider};

pub mod openweather;

/// Remote source of city weather records.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Find the cities matching `query`, in the order the provider ranks them.
    async fn find(&self, query: &WeatherQuery) -> Result<Vec<CityWeather>, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `cityweather configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let mut provider = OpenWeatherProvider::new(api_key.to_owned());

    if let Some(base_url) = config.base_url() {
        provider = provider.with_base_url(base_url);
    }

    if let Some(secs) = config.timeout_secs() {
        let http = Client::builder()
            .timeout(Duration::from_secs(secs))
            .build()
            .context("Failed to build HTTP client")?;
        provider = provider.with_client(http);
    }

    Ok(Box::new(provider))
}

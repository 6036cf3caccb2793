use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    FetchError,
    model::{CityWeather, Condition, Temperature, WeatherQuery},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const FIND_PATH: &str = "/data/2.5/find";

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the provider at another host, e.g. a proxy or a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }
}

// The API key stays out of logs and panic messages.
impl fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct OwFindResponse {
    list: Option<Vec<OwCity>>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    id: u64,
    name: String,
    sys: Option<OwSys>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    icon: String,
}

impl From<OwCity> for CityWeather {
    fn from(city: OwCity) -> Self {
        CityWeather {
            id: city.id,
            name: city.name,
            country: city.sys.and_then(|s| s.country).unwrap_or_default(),
            temperature: Temperature {
                current: city.main.temp,
                min: city.main.temp_min,
                max: city.main.temp_max,
            },
            conditions: city
                .weather
                .into_iter()
                .map(|w| Condition { category: w.main, icon: w.icon })
                .collect(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn find(&self, query: &WeatherQuery) -> Result<Vec<CityWeather>, FetchError> {
        let url = format!("{}{}", self.base_url, FIND_PATH);

        let request = self.http.get(&url);
        let request = match query {
            WeatherQuery::City(name) => request.query(&[("q", name.as_str())]),
            WeatherQuery::Coordinates { lat, lon } => request.query(&[("lat", lat), ("lon", lon)]),
        };

        tracing::debug!(?query, "requesting OpenWeather find");

        let res = request
            .query(&[("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(FetchError::transport)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::transport)?;

        if !status.is_success() {
            return Err(FetchError::status(status, &body));
        }

        let parsed: OwFindResponse = serde_json::from_str(&body)?;

        Ok(parsed
            .list
            .unwrap_or_default()
            .into_iter()
            .map(CityWeather::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_find_entry_into_city_weather() {
        let json = serde_json::json!({
            "id": 2950159,
            "name": "Berlin",
            "coord": { "lat": 52.5244, "lon": 13.4105 },
            "sys": { "country": "DE" },
            "main": { "temp": 11.2, "feels_like": 10.1, "temp_min": 9.4, "temp_max": 12.8 },
            "weather": [
                { "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" },
                { "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }
            ]
        });

        let city: CityWeather = serde_json::from_value::<OwCity>(json).unwrap().into();

        assert_eq!(city.id, 2950159);
        assert_eq!(city.name, "Berlin");
        assert_eq!(city.country, "DE");
        assert_eq!(city.temperature, Temperature { current: 11.2, min: 9.4, max: 12.8 });
        assert_eq!(city.conditions.len(), 2);
        assert_eq!(city.conditions[0].category, "Clouds");
        assert_eq!(city.conditions[1].icon, "10d");
    }

    #[test]
    fn missing_country_decodes_as_empty() {
        let json = serde_json::json!({
            "id": 1,
            "name": "Nowhere",
            "main": { "temp": 0.0, "temp_min": 0.0, "temp_max": 0.0 }
        });

        let city: CityWeather = serde_json::from_value::<OwCity>(json).unwrap().into();
        assert_eq!(city.country, "");
        assert!(city.conditions.is_empty());
    }

    #[test]
    fn missing_list_is_none() {
        let parsed: OwFindResponse =
            serde_json::from_str(r#"{"message":"accurate","cod":"200","count":0}"#).unwrap();
        assert!(parsed.list.is_none());
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let provider = OpenWeatherProvider::new("k".into()).with_base_url("http://127.0.0.1:9000/");
        assert_eq!(provider.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let provider = OpenWeatherProvider::new("super-secret".into());
        let debug = format!("{provider:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}

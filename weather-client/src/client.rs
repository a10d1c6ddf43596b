use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

use crate::{
    Config,
    error::{ClientError, truncate_body},
    model::{current_fallback, forecast_fallback},
};

pub const DEFAULT_BASE_URL: &str = "https://api.weather.example.com";
pub const DEFAULT_FORECAST_DAYS: u32 = 5;

/// The four operations of the weather API.
///
/// None of them fail: request errors turn into an error-carrying mapping,
/// an empty list or `false`.
#[async_trait]
pub trait WeatherApi: Send + Sync + fmt::Debug {
    async fn get_current_weather(&self, city: &str) -> Value;
    async fn get_forecast(&self, city: &str, days: u32) -> Value;
    async fn get_cities_by_country(&self, country: &str) -> Vec<String>;
    async fn validate_api_key(&self) -> bool;
}

/// HTTP client for the weather API. Every request carries the bearer token.
#[derive(Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl fmt::Debug for WeatherApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct CitiesBody {
    #[serde(default)]
    cities: Vec<String>,
}

impl WeatherApiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let api_key = api_key.into();

        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| ClientError::InvalidApiKey)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            api_key,
            base_url: base_url.into(),
            http,
        })
    }

    pub fn with_default_base_url(api_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::new(api_key, DEFAULT_BASE_URL)
    }

    /// Construct a client from config, failing when no API key is configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?;
        Ok(Self::new(api_key, config.base_url())?)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    async fn get_json(
        &self,
        endpoint: &'static str,
        query: &[(&str, String)],
    ) -> Result<Value, ClientError> {
        let url = self.endpoint_url(endpoint);
        debug!("GET {} with query {:?}", url, query);

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| ClientError::Decode { endpoint, source })
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_current_weather(&self, city: &str) -> Result<Value, ClientError> {
        self.get_json("current", &[("city", city.to_string())]).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_forecast(&self, city: &str, days: u32) -> Result<Value, ClientError> {
        self.get_json("forecast", &[("city", city.to_string()), ("days", days.to_string())])
            .await
    }

    /// Cities listed under the `"cities"` key; a body without it yields an empty list.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_cities_by_country(&self, country: &str) -> Result<Vec<String>, ClientError> {
        let value = self.get_json("cities", &[("country", country.to_string())]).await?;
        let body: CitiesBody = serde_json::from_value(value)
            .map_err(|source| ClientError::Decode { endpoint: "cities", source })?;
        Ok(body.cities)
    }

    /// Status code the server answers `/validate` with. Any status is `Ok`.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_key_status(&self) -> Result<StatusCode, ClientError> {
        let url = self.endpoint_url("validate");
        debug!("GET {}", url);

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport { endpoint: "validate", source })?;

        Ok(res.status())
    }

    pub async fn get_current_weather(&self, city: &str) -> Value {
        self.fetch_current_weather(city).await.unwrap_or_else(|err| {
            warn!(status = ?err.status(), "Current weather for {city} unavailable: {err}");
            current_fallback(city, err)
        })
    }

    pub async fn get_forecast(&self, city: &str, days: u32) -> Value {
        self.fetch_forecast(city, days).await.unwrap_or_else(|err| {
            warn!(status = ?err.status(), "Forecast for {city} unavailable: {err}");
            forecast_fallback(city, days, err)
        })
    }

    pub async fn get_cities_by_country(&self, country: &str) -> Vec<String> {
        self.fetch_cities_by_country(country).await.unwrap_or_else(|err| {
            warn!(status = ?err.status(), "City list for {country} unavailable: {err}");
            Vec::new()
        })
    }

    /// True only when `/validate` answers with exactly 200.
    pub async fn validate_api_key(&self) -> bool {
        match self.fetch_key_status().await {
            Ok(status) => status == StatusCode::OK,
            Err(err) => {
                warn!("API key validation failed: {err}");
                false
            }
        }
    }
}

#[async_trait]
impl WeatherApi for WeatherApiClient {
    async fn get_current_weather(&self, city: &str) -> Value {
        WeatherApiClient::get_current_weather(self, city).await
    }

    async fn get_forecast(&self, city: &str, days: u32) -> Value {
        WeatherApiClient::get_forecast(self, city, days).await
    }

    async fn get_cities_by_country(&self, country: &str) -> Vec<String> {
        WeatherApiClient::get_cities_by_country(self, country).await
    }

    async fn validate_api_key(&self) -> bool {
        WeatherApiClient::validate_api_key(self).await
    }
}

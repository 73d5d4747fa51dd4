use crate::{
    Config,
    credentials::{CredentialProvider, EnvCredentials},
    error::WeatherError,
    model::{Extensions, QueryResult, WeatherData, WeatherQuery},
    transport::{HttpRequest, ReqwestTransport, Transport},
};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};
use tracing::{debug, info, warn};

pub mod amap;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Answer one query. Failures are reported inside the returned [`QueryResult`].
    async fn fetch(&self, query: &WeatherQuery) -> QueryResult;
}

/// Queries the AMap weather-info endpoint.
///
/// Holds no per-call state, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct WeatherService<C = EnvCredentials, T = ReqwestTransport> {
    credentials: C,
    transport: T,
    endpoint: String,
    timeout: Duration,
}

impl WeatherService {
    /// Default endpoint and timeout, key from `AMAP_API_KEY`.
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_parts(
            config,
            EnvCredentials::new(config.api_key_env.as_str()),
            ReqwestTransport::new(),
        )
    }
}

impl Default for WeatherService {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CredentialProvider, T: Transport> WeatherService<C, T> {
    pub fn with_parts(config: &Config, credentials: C, transport: T) -> Self {
        Self {
            credentials,
            transport,
            endpoint: config.endpoint.clone(),
            timeout: config.timeout(),
        }
    }

    /// Live conditions (`extensions` = `"base"`, the default) or a forecast
    /// (`"all"`) for the region identified by `city`.
    pub async fn get_weather(&self, city: &str, extensions: Option<&str>) -> QueryResult {
        self.query(&WeatherQuery::new(city, extensions)).await
    }

    async fn query(&self, query: &WeatherQuery) -> QueryResult {
        let result = self.run(query).await;

        match &result {
            Ok(data) => info!(city = %query.city, kind = data.kind(), "weather query succeeded"),
            Err(err) => warn!(
                city = %query.city,
                code = %err.code(),
                infocode = err.infocode(),
                "weather query failed: {err}"
            ),
        }

        result.into()
    }

    /// Checks run in a fixed order and the first failure wins; nothing goes
    /// over the wire until all of them pass.
    async fn run(&self, query: &WeatherQuery) -> Result<WeatherData, WeatherError> {
        let extensions = Extensions::resolve(query.extensions.as_deref())?;
        let city = validate_city(&query.city)?;
        let api_key = self.api_key()?;

        debug!(city, %extensions, "querying AMap weather");

        let request =
            HttpRequest::weather_info(&self.endpoint, &api_key, city, extensions, self.timeout);
        let body = self.transport.get(&request).await?;

        amap::decode(&body, extensions)
    }

    fn api_key(&self) -> Result<String, WeatherError> {
        self.credentials
            .api_key()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| WeatherError::MissingApiKey(self.credentials.source()))
    }
}

/// Any non-blank code is accepted; the provider decides whether it exists.
fn validate_city(city: &str) -> Result<&str, WeatherError> {
    let city = city.trim();
    if city.is_empty() {
        return Err(WeatherError::InvalidCity);
    }
    Ok(city)
}

#[async_trait]
impl<C: CredentialProvider, T: Transport> WeatherProvider for WeatherService<C, T> {
    async fn fetch(&self, query: &WeatherQuery) -> QueryResult {
        self.query(query).await
    }
}

/// Construct a provider from an explicit config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    config.validate()?;
    Ok(Box::new(WeatherService::from_config(config)))
}

/// Construct a provider from the on-disk config, falling back to defaults.
pub fn default_provider() -> anyhow::Result<Box<dyn WeatherProvider>> {
    let config = Config::load()?;
    provider_from_config(&config)
}

//! Client for the AMap (高德) weather-info API.
//!
//! This crate defines:
//! - Configuration (endpoint, timeout, where the API key comes from)
//! - Credential lookup and the HTTP transport, both swappable
//! - The query pipeline that validates input, calls the provider and
//!   classifies every outcome into a [`QueryResult`]
//!
//! ```no_run
//! # async fn demo() {
//! let result = amap_weather::get_weather("110101", Some("all")).await;
//! if let Some(code) = result.error_code() {
//!     eprintln!("query failed: {code}");
//! }
//! # }
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod model;
pub mod provider;
pub mod transport;

pub use config::Config;
pub use credentials::{CredentialProvider, EnvCredentials, StaticCredentials};
pub use error::WeatherError;
pub use model::{
    Cast, ErrorCode, Extensions, Failure, ForecastWeather, LiveWeather, QueryResult, WeatherData,
    WeatherQuery,
};
pub use provider::{WeatherProvider, WeatherService, default_provider, provider_from_config};
pub use transport::{HttpRequest, ReqwestTransport, Transport, TransportError};

/// Query with the default configuration, reading the key from `AMAP_API_KEY`.
pub async fn get_weather(city: &str, extensions: Option<&str>) -> QueryResult {
    WeatherService::new().get_weather(city, extensions).await
}

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};
use std::fmt;

use crate::{error::WeatherError, provider::amap::text};

/// Query mode understood by the weather-info endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extensions {
    /// Current conditions.
    #[default]
    Base,
    /// Multi-day forecast.
    All,
}

impl Extensions {
    pub fn as_str(&self) -> &'static str {
        match self {
            Extensions::Base => "base",
            Extensions::All => "all",
        }
    }

    /// Result `type` reported for this mode.
    pub fn kind(&self) -> &'static str {
        match self {
            Extensions::Base => "live",
            Extensions::All => "forecast",
        }
    }

    /// Absent or empty input falls back to [`Extensions::Base`].
    pub fn resolve(value: Option<&str>) -> Result<Self, WeatherError> {
        match value {
            None | Some("") => Ok(Extensions::default()),
            Some(v) => Extensions::try_from(v),
        }
    }
}

impl fmt::Display for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Extensions {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "base" => Ok(Extensions::Base),
            "all" => Ok(Extensions::All),
            other => Err(WeatherError::InvalidExtensions(other.to_string())),
        }
    }
}

/// Raw query as handed in by a caller; validated by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
    pub extensions: Option<String>,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>, extensions: Option<&str>) -> Self {
        Self {
            city: city.into(),
            extensions: extensions.map(str::to_owned),
        }
    }

    pub fn live(city: impl Into<String>) -> Self {
        Self::new(city, Some(Extensions::Base.as_str()))
    }

    pub fn forecast(city: impl Into<String>) -> Self {
        Self::new(city, Some(Extensions::All.as_str()))
    }
}

const REPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current-conditions snapshot, fields kept verbatim as reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveWeather {
    #[serde(deserialize_with = "text")]
    pub province: String,
    #[serde(deserialize_with = "text")]
    pub city: String,
    #[serde(default, deserialize_with = "text")]
    pub adcode: String,
    #[serde(deserialize_with = "text")]
    pub weather: String,
    #[serde(deserialize_with = "text")]
    pub temperature: String,
    #[serde(deserialize_with = "text")]
    pub winddirection: String,
    #[serde(deserialize_with = "text")]
    pub windpower: String,
    #[serde(deserialize_with = "text")]
    pub humidity: String,
    #[serde(deserialize_with = "text")]
    pub reporttime: String,
}

impl LiveWeather {
    /// Temperature in °C.
    pub fn temperature_c(&self) -> Option<f64> {
        self.temperature.trim().parse().ok()
    }

    /// Relative humidity in %.
    pub fn humidity_pct(&self) -> Option<f64> {
        self.humidity.trim().parse().ok()
    }

    pub fn report_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.reporttime, REPORT_TIME_FORMAT).ok()
    }
}

/// One day of a forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cast {
    #[serde(deserialize_with = "text")]
    pub date: String,
    #[serde(deserialize_with = "text")]
    pub week: String,
    #[serde(deserialize_with = "text")]
    pub dayweather: String,
    #[serde(deserialize_with = "text")]
    pub nightweather: String,
    #[serde(deserialize_with = "text")]
    pub daytemp: String,
    #[serde(deserialize_with = "text")]
    pub nighttemp: String,
    #[serde(deserialize_with = "text")]
    pub daywind: String,
    #[serde(deserialize_with = "text")]
    pub nightwind: String,
    #[serde(deserialize_with = "text")]
    pub daypower: String,
    #[serde(deserialize_with = "text")]
    pub nightpower: String,
}

impl Cast {
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Forecast for a region; `casts` keeps the provider's order and length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastWeather {
    #[serde(deserialize_with = "text")]
    pub province: String,
    #[serde(deserialize_with = "text")]
    pub city: String,
    #[serde(default, deserialize_with = "text")]
    pub adcode: String,
    #[serde(deserialize_with = "text")]
    pub reporttime: String,
    pub casts: Vec<Cast>,
}

impl ForecastWeather {
    pub fn report_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.reporttime, REPORT_TIME_FORMAT).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherData {
    Live(LiveWeather),
    Forecast(ForecastWeather),
}

impl WeatherData {
    /// `"live"` or `"forecast"`.
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherData::Live(_) => Extensions::Base.kind(),
            WeatherData::Forecast(_) => Extensions::All.kind(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidCity,
    InvalidExtensions,
    MissingApiKey,
    NetworkError,
    Timeout,
    ApiError,
    NoData,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidCity => "INVALID_CITY",
            ErrorCode::InvalidExtensions => "INVALID_EXTENSIONS",
            ErrorCode::MissingApiKey => "MISSING_API_KEY",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::ApiError => "API_ERROR",
            ErrorCode::NoData => "NO_DATA",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub error: String,
    pub error_code: ErrorCode,
    pub api_infocode: Option<String>,
}

impl From<WeatherError> for Failure {
    fn from(err: WeatherError) -> Self {
        Failure {
            error: err.to_string(),
            error_code: err.code(),
            api_infocode: err.infocode().map(str::to_owned),
        }
    }
}

/// Outcome of a single weather query.
///
/// Serializes to `{"success": true, "type", "data"}` or to
/// `{"success": false, "error", "error_code", "api_infocode"?}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    Success(WeatherData),
    Failure(Failure),
}

impl QueryResult {
    pub fn is_success(&self) -> bool {
        matches!(self, QueryResult::Success(_))
    }

    pub fn data(&self) -> Option<&WeatherData> {
        match self {
            QueryResult::Success(data) => Some(data),
            QueryResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            QueryResult::Success(_) => None,
            QueryResult::Failure(failure) => Some(failure),
        }
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.failure().map(|f| f.error_code)
    }
}

impl From<Result<WeatherData, WeatherError>> for QueryResult {
    fn from(result: Result<WeatherData, WeatherError>) -> Self {
        match result {
            Ok(data) => QueryResult::Success(data),
            Err(err) => QueryResult::Failure(err.into()),
        }
    }
}

impl Serialize for QueryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            QueryResult::Success(data) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("type", data.kind())?;
                match data {
                    WeatherData::Live(live) => map.serialize_entry("data", live)?,
                    WeatherData::Forecast(forecast) => map.serialize_entry("data", forecast)?,
                }
                map.end()
            }
            QueryResult::Failure(failure) => {
                let len = if failure.api_infocode.is_some() { 4 } else { 3 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", &failure.error)?;
                map.serialize_entry("error_code", &failure.error_code)?;
                if let Some(infocode) = &failure.api_infocode {
                    map.serialize_entry("api_infocode", infocode)?;
                }
                map.end()
            }
        }
    }
}

use std::time::Duration;

use thiserror::Error;

use crate::model::{ErrorCode, Extensions};

/// Everything that can go wrong while answering a weather query.
///
/// Variants are ordered by the phase in which they are detected. Each maps to
/// exactly one stable [`ErrorCode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("extensions must be 'base' or 'all', got '{0}'")]
    InvalidExtensions(String),

    #[error("city must be a non-empty region code (adcode)")]
    InvalidCity,

    #[error("no AMap API key found in {0}")]
    MissingApiKey(String),

    #[error("network request failed: {0}")]
    Network(String),

    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("AMap API returned an error: {info}")]
    Api {
        info: String,
        infocode: Option<String>,
    },

    #[error("AMap API returned no {} data for this city", .0.kind())]
    NoData(Extensions),
}

impl WeatherError {
    pub fn code(&self) -> ErrorCode {
        match self {
            WeatherError::InvalidExtensions(_) => ErrorCode::InvalidExtensions,
            WeatherError::InvalidCity => ErrorCode::InvalidCity,
            WeatherError::MissingApiKey(_) => ErrorCode::MissingApiKey,
            WeatherError::Network(_) => ErrorCode::NetworkError,
            WeatherError::Timeout(_) => ErrorCode::Timeout,
            WeatherError::Api { .. } => ErrorCode::ApiError,
            WeatherError::NoData(_) => ErrorCode::NoData,
        }
    }

    /// Provider info code, only for failures decoded from a provider error payload.
    pub fn infocode(&self) -> Option<&str> {
        match self {
            WeatherError::Api { infocode, .. } => infocode.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn malformed(what: impl std::fmt::Display) -> Self {
        WeatherError::Api {
            info: format!("malformed response: {what}"),
            infocode: None,
        }
    }
}

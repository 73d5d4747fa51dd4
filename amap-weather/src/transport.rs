use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};
use thiserror::Error;
use tracing::debug;

use crate::{error::WeatherError, model::Extensions};

/// A single outbound GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(&'static str, String)>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub(crate) fn weather_info(
        endpoint: &str,
        api_key: &str,
        city: &str,
        extensions: Extensions,
        timeout: Duration,
    ) -> Self {
        Self {
            url: endpoint.to_string(),
            query: vec![
                ("key", api_key.to_string()),
                ("city", city.to_string()),
                ("extensions", extensions.as_str().to_string()),
                ("output", "JSON".to_string()),
            ],
            timeout,
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Network(String),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<TransportError> for WeatherError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(after) => WeatherError::Timeout(after),
            other => WeatherError::Network(other.to_string()),
        }
    }
}

/// Performs the HTTP exchange and hands back the raw response body.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, request: &HttpRequest) -> Result<String, TransportError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &HttpRequest) -> Result<String, TransportError> {
        debug!(url = %request.url, timeout = ?request.timeout, "sending request");

        let res = self
            .http
            .get(&request.url)
            .query(&request.query)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| classify(e, request.timeout))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| classify(e, request.timeout))?;

        debug!(status = status.as_u16(), bytes = body.len(), "received response");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Network(err.to_string())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}

//! HTTP fetcher for the backend's `/sensor-data` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{classify_response, FetchError, Fetcher};
use crate::data::SensorReading;

/// Path of the latest-reading endpoint, relative to the base URL.
pub const SENSOR_DATA_PATH: &str = "/sensor-data";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches readings with `GET {base}/sensor-data`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    url: String,
    description: String,
}

impl HttpFetcher {
    /// Create a fetcher for the given base URL with the default timeout.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        let url = sensor_data_url(base_url);
        Ok(Self {
            client,
            description: format!("http: {}", url),
            url,
        })
    }

    /// Full URL requested on every cycle.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Join the base URL and the endpoint path without doubling slashes.
fn sensor_data_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with(SENSOR_DATA_PATH) {
        base.to_string()
    } else {
        format!("{}{}", base, SENSOR_DATA_PATH)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self) -> Result<SensorReading, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        debug!(status, bytes = body.len(), "sensor-data response");

        classify_response(status, &body)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

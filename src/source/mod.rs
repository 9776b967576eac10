//! Fetchers for the latest sensor reading.
//!
//! A [`Fetcher`] performs exactly one request per call. Scheduling, retry
//! cadence and what to do with failures belong to the dashboard's polling
//! loop, not to the fetcher.

mod error;
mod file;
mod http;

pub use error::FetchError;
pub use file::FileFetcher;
pub use http::{HttpFetcher, SENSOR_DATA_PATH};

use std::fmt::Debug;

use async_trait::async_trait;

use crate::data::SensorReading;

/// Trait for acquiring the latest reading from a backend.
///
/// # Example
///
/// ```no_run
/// use shmwatch::{Fetcher, HttpFetcher};
///
/// # tokio_test::block_on(async {
/// let fetcher = HttpFetcher::new("http://127.0.0.1:5000").unwrap();
/// match fetcher.fetch().await {
///     Ok(reading) => println!("vibration = {}", reading.vibration),
///     Err(e) => eprintln!("fetch failed: {}", e),
/// }
/// # });
/// ```
#[async_trait]
pub trait Fetcher: Send + Sync + Debug {
    /// Issue one request for the latest reading.
    async fn fetch(&self) -> Result<SensorReading, FetchError>;

    /// Returns a human-readable description of the backend.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}

/// Decide the outcome of a response from its status and body.
///
/// A non-2xx status or a body carrying an `error` member is a failure
/// even when the rest of the payload would decode.
pub fn classify_response(status: u16, body: &[u8]) -> Result<SensorReading, FetchError> {
    if !(200..300).contains(&status) {
        return Err(FetchError::Status(status));
    }

    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    if let Some(err) = value.get("error") {
        let message = match err {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(FetchError::Remote(message));
    }

    serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
}

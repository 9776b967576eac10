//! File-based fetcher.
//!
//! Re-reads a JSON file on every cycle. Useful for demos and for driving
//! the dashboard from a script that rewrites the file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{classify_response, FetchError, Fetcher};
use crate::data::SensorReading;

/// A fetcher that reads the latest reading from a JSON file.
///
/// The file holds the same body `GET /sensor-data` would return, including
/// an optional `error` member. A missing or unreadable file is a failed
/// cycle.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    path: PathBuf,
    description: String,
}

impl FileFetcher {
    /// Create a new file fetcher for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Fetcher for FileFetcher {
    async fn fetch(&self) -> Result<SensorReading, FetchError> {
        let content = tokio::fs::read(&self.path).await?;
        classify_response(200, &content)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

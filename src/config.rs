//! Runtime settings for the binary.
//!
//! Layers, lowest precedence first: built-in defaults, an optional TOML
//! file, `SHMWATCH_*` environment variables. Command-line overrides are
//! applied on top by the caller.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::dashboard::DashboardConfig;
use crate::data::duration;
use crate::data::SERIES_CAPACITY;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "shmwatch.toml";
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";
pub const ENV_PREFIX: &str = "SHMWATCH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Base URL of the sensor backend.
    pub endpoint: String,
    /// Read readings from this JSON file instead of the endpoint.
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(deserialize_with = "duration::deserialize")]
    pub poll_interval: Duration,
    #[serde(deserialize_with = "duration::deserialize")]
    pub alert_duration: Duration,
    #[serde(deserialize_with = "duration::deserialize")]
    pub request_timeout: Duration,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Settings {
    /// Load settings from defaults, a config file and the environment.
    ///
    /// An explicit `config_path` must exist; the default file is optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with(config_path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(config_path: Option<&Path>, env: Environment) -> Result<Self> {
        let (path, required) = match config_path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        let config = Config::builder()
            .set_default("endpoint", DEFAULT_ENDPOINT)?
            .set_default("poll_interval", "2s")?
            .set_default("alert_duration", "10s")?
            .set_default("request_timeout", "5s")?
            .set_default("log_file", "shmwatch.log")?
            .set_default("log_level", "info")?
            .add_source(File::from(path).required(required))
            .add_source(env)
            .build()
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let settings: Settings = config.try_deserialize().context("Invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the dashboard cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            bail!("poll_interval must be greater than zero");
        }
        if self.alert_duration.is_zero() {
            bail!("alert_duration must be greater than zero");
        }
        if self.request_timeout.is_zero() {
            bail!("request_timeout must be greater than zero");
        }
        if self.endpoint.trim().is_empty() && self.file.is_none() {
            bail!("either endpoint or file must be set");
        }
        Ok(())
    }

    pub fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig {
            poll_interval: self.poll_interval,
            alert_duration: self.alert_duration,
            capacity: SERIES_CAPACITY,
        }
    }
}

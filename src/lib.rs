//! # shmwatch
//!
//! A terminal dashboard and library for live structural health monitoring
//! readings: vibration, strain and temperature.
//!
//! The dashboard polls a sensor backend on a fixed cadence, keeps a short
//! rolling history per channel for charting, tracks whether the backend is
//! reachable, and surfaces warning/critical alerts as a timed banner plus
//! tinted card borders.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌───────────┐    ┌──────────┐   ┌──────────┐ │
//! │  │  app    │───▶│ dashboard │───▶│ surface  │──▶│    ui    │ │
//! │  │ (driver)│    │  (state)  │    │(retained)│   │(ratatui) │ │
//! │  └────┬────┘    └───────────┘    └──────────┘   └──────────┘ │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐                                                 │
//! │  │ source  │◀── HttpFetcher | FileFetcher                    │
//! │  │ (fetch) │                                                 │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`dashboard`]**: The deterministic core. Polling loop, series
//!   buffers, connection monitor and alert presenter, driven by a
//!   [`Clock`] and writing to a [`Surface`]
//! - **[`source`]**: The [`Fetcher`] trait with HTTP and file backends
//! - **[`data`]**: Reading model, bounded series buffers, duration parsing
//! - **[`surface`]**: Presentation elements and the retained [`ScreenState`]
//! - **[`app`]**, **[`events`]**, **[`ui`]**: The terminal front end
//! - **[`config`]**: Layered settings for the binary
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll the default backend at http://127.0.0.1:5000/sensor-data
//! shmwatch
//!
//! # Poll another backend every 500ms
//! shmwatch --endpoint http://sensors.local:8080 --poll-interval 500ms
//!
//! # Fetch once, print the reading and exit
//! shmwatch --probe
//! ```
//!
//! ### Driving the dashboard core directly
//!
//! ```
//! use std::time::Duration;
//! use shmwatch::{
//!     Channel, ConnectionState, Dashboard, DashboardConfig, Element, ManualClock,
//!     ScreenState, SensorReading,
//! };
//!
//! let clock = ManualClock::default();
//! let mut dashboard = Dashboard::new(
//!     DashboardConfig::default(),
//!     Box::new(clock.clone()),
//!     ScreenState::new(),
//! );
//! dashboard.start();
//!
//! // The first cycle is due immediately
//! let cycle = dashboard.tick().unwrap();
//! dashboard.complete(cycle, Ok(SensorReading::new(1.25, 0.4, 22.0)));
//!
//! assert_eq!(dashboard.connection(), ConnectionState::Connected);
//! assert_eq!(
//!     dashboard.surface().text(Element::Value(Channel::Vibration)),
//!     Some("1.25 mm/s")
//! );
//!
//! // Nothing is due until the poll interval has passed
//! assert!(dashboard.tick().is_none());
//! clock.advance(Duration::from_millis(2000));
//! assert!(dashboard.tick().is_some());
//! ```
//!
//! ### Fetching from a file
//!
//! ```no_run
//! use shmwatch::{FileFetcher, Fetcher};
//!
//! # tokio_test::block_on(async {
//! let fetcher = FileFetcher::new("reading.json");
//! let reading = fetcher.fetch().await.unwrap();
//! println!("strain = {}", reading.strain);
//! # });
//! ```

pub mod app;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod events;
pub mod source;
pub mod surface;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use clock::{Clock, ManualClock, SystemClock, Timer};
pub use config::Settings;
pub use dashboard::{ConnectionState, CycleStats, Cycle, Dashboard, DashboardConfig};
pub use data::{AlertLevel, Channel, SensorReading, SeriesBuffer, SeriesPoint, SeriesSet};
pub use source::{classify_response, FetchError, Fetcher, FileFetcher, HttpFetcher};
pub use surface::{Element, ScreenState, Surface, Tone};

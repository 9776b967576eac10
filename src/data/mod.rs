//! Data models for sensor readings and their rolling history.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "2s", "500ms")
//! - [`reading`]: The decoded backend payload ([`SensorReading`], [`AlertLevel`], [`Channel`])
//! - [`series`]: Bounded per-channel history feeding the charts ([`SeriesBuffer`], [`SeriesSet`])
//!
//! ## Data Flow
//!
//! ```text
//! GET /sensor-data (raw JSON)
//!        │
//!        ▼
//! SensorReading
//!        │
//!        ├──▶ SeriesSet::append() (one point per channel, shared label)
//!        │
//!        └──▶ AlertPresenter (banner + card tones)
//! ```

pub mod duration;
pub mod reading;
pub mod series;

pub use reading::{AlertLevel, Channel, SensorReading};
pub use series::{SeriesBuffer, SeriesPoint, SeriesSet, SERIES_CAPACITY};

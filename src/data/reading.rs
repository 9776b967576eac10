//! Sensor reading payloads as served by the backend.

use serde::{Deserialize, Serialize};

/// Severity attached to a reading by the backend's anomaly detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Normal,
    Warning,
    Critical,
}

impl AlertLevel {
    /// Returns the display label for this level.
    pub fn label(&self) -> &'static str {
        match self {
            AlertLevel::Normal => "normal",
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, AlertLevel::Normal)
    }
}

/// One of the three sensor channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Vibration,
    Strain,
    Temperature,
}

impl Channel {
    /// All channels in display order.
    pub const ALL: [Channel; 3] = [Channel::Vibration, Channel::Strain, Channel::Temperature];

    /// Returns the display title for this channel.
    pub fn title(&self) -> &'static str {
        match self {
            Channel::Vibration => "Vibration",
            Channel::Strain => "Strain",
            Channel::Temperature => "Temperature",
        }
    }

    /// Unit suffix appended to formatted values.
    pub fn unit(&self) -> &'static str {
        match self {
            Channel::Vibration => " mm/s",
            Channel::Strain => "",
            Channel::Temperature => "°C",
        }
    }

    /// Format a value with the precision the backend reports for this channel.
    pub fn format_value(&self, value: f64) -> String {
        match self {
            Channel::Vibration => format!("{:.2}{}", value, self.unit()),
            Channel::Strain => format!("{:.3}{}", value, self.unit()),
            Channel::Temperature => format!("{:.1}{}", value, self.unit()),
        }
    }
}

/// The latest reading returned by `GET /sensor-data`.
///
/// The three channel values are required: a payload missing any of them
/// fails to decode and the cycle is treated as failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub vibration: f64,
    pub strain: f64,
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_level: Option<AlertLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_messages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_anomaly: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly_score: Option<f64>,
}

impl SensorReading {
    /// Create a reading with channel values only.
    pub fn new(vibration: f64, strain: f64, temperature: f64) -> Self {
        Self {
            vibration,
            strain,
            temperature,
            alert_level: None,
            alert_messages: None,
            id: None,
            is_anomaly: None,
            anomaly_score: None,
        }
    }

    /// Attach an alert level and messages.
    pub fn with_alert(mut self, level: AlertLevel, messages: &[&str]) -> Self {
        self.alert_level = Some(level);
        self.alert_messages = Some(messages.iter().map(|m| m.to_string()).collect());
        self
    }

    /// Value for a single channel.
    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Vibration => self.vibration,
            Channel::Strain => self.strain,
            Channel::Temperature => self.temperature,
        }
    }

    /// Alert messages, empty when absent.
    pub fn messages(&self) -> &[String] {
        self.alert_messages.as_deref().unwrap_or(&[])
    }
}

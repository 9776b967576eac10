//! Presentation and chart surface the dashboard writes into.
//!
//! The dashboard never draws. It writes text, visibility, tones and chart
//! series into a [`Surface`] keyed by [`Element`]. The TUI uses
//! [`ScreenState`], a retained model that the ratatui renderer reads on
//! every frame.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::data::Channel;

/// Stable keys for the elements the dashboard updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// Formatted current value for a channel.
    Value(Channel),
    /// Time of the last successful update.
    LastUpdate,
    StatusConnected,
    StatusDisconnected,
    AlertBanner,
    AlertMessage,
    /// The panel framing a channel's value and chart.
    Card(Channel),
    /// Backend anomaly score for the latest reading.
    AnomalyScore,
}

impl Element {
    /// The stable string key of this element.
    pub fn key(&self) -> &'static str {
        match self {
            Element::Value(Channel::Vibration) => "vibration-value",
            Element::Value(Channel::Strain) => "strain-value",
            Element::Value(Channel::Temperature) => "temperature-value",
            Element::LastUpdate => "last-update",
            Element::StatusConnected => "status-connected",
            Element::StatusDisconnected => "status-disconnected",
            Element::AlertBanner => "alert-banner",
            Element::AlertMessage => "alert-message",
            Element::Card(Channel::Vibration) => "vibration-card",
            Element::Card(Channel::Strain) => "strain-card",
            Element::Card(Channel::Temperature) => "temperature-card",
            Element::AnomalyScore => "anomaly-score",
        }
    }

    /// All card containers.
    pub fn cards() -> impl Iterator<Item = Element> {
        crate::data::Channel::ALL.into_iter().map(Element::Card)
    }
}

/// Styling cue applied to banners and card borders.
///
/// An element carries at most one tone, so applying a tone replaces the
/// other two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Success,
    Warning,
    Danger,
}

/// Collaborator receiving the dashboard's output.
pub trait Surface {
    fn set_text(&mut self, element: Element, text: String);

    fn set_visible(&mut self, element: Element, visible: bool);

    /// Replace the element's tone.
    fn set_tone(&mut self, element: Element, tone: Tone);

    /// Replace a channel's chart series without transition animation.
    ///
    /// `labels` and `values` always have equal length.
    fn refresh_chart(&mut self, channel: Channel, labels: Vec<String>, values: Vec<f64>);
}

/// Chart contents for one channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Retained screen model.
#[derive(Debug, Clone)]
pub struct ScreenState {
    texts: HashMap<Element, String>,
    visible: HashSet<Element>,
    tones: HashMap<Element, Tone>,
    charts: BTreeMap<Channel, ChartData>,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenState {
    pub fn new() -> Self {
        Self {
            texts: HashMap::new(),
            visible: HashSet::new(),
            tones: HashMap::new(),
            charts: Channel::ALL.into_iter().map(|c| (c, ChartData::default())).collect(),
        }
    }

    pub fn text(&self, element: Element) -> Option<&str> {
        self.texts.get(&element).map(String::as_str)
    }

    pub fn is_visible(&self, element: Element) -> bool {
        self.visible.contains(&element)
    }

    pub fn tone(&self, element: Element) -> Option<Tone> {
        self.tones.get(&element).copied()
    }

    pub fn chart(&self, channel: Channel) -> &ChartData {
        // Every channel is inserted at construction
        &self.charts[&channel]
    }
}

impl Surface for ScreenState {
    fn set_text(&mut self, element: Element, text: String) {
        self.texts.insert(element, text);
    }

    fn set_visible(&mut self, element: Element, visible: bool) {
        if visible {
            self.visible.insert(element);
        } else {
            self.visible.remove(&element);
        }
    }

    fn set_tone(&mut self, element: Element, tone: Tone) {
        self.tones.insert(element, tone);
    }

    fn refresh_chart(&mut self, channel: Channel, labels: Vec<String>, values: Vec<f64>) {
        self.charts.insert(channel, ChartData { labels, values });
    }
}

/// Surface that records every call, for asserting on emitted effects.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSurface {
    pub screen: ScreenState,
    pub visibility_calls: Vec<(Element, bool)>,
    pub tone_calls: Vec<(Element, Tone)>,
}

#[cfg(test)]
impl RecordingSurface {
    /// Visibility calls made against one element.
    pub fn visibility_of(&self, element: Element) -> Vec<bool> {
        self.visibility_calls
            .iter()
            .filter(|(e, _)| *e == element)
            .map(|(_, v)| *v)
            .collect()
    }
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn set_text(&mut self, element: Element, text: String) {
        self.screen.set_text(element, text);
    }

    fn set_visible(&mut self, element: Element, visible: bool) {
        self.visibility_calls.push((element, visible));
        self.screen.set_visible(element, visible);
    }

    fn set_tone(&mut self, element: Element, tone: Tone) {
        self.tone_calls.push((element, tone));
        self.screen.set_tone(element, tone);
    }

    fn refresh_chart(&mut self, channel: Channel, labels: Vec<String>, values: Vec<f64>) {
        self.screen.refresh_chart(channel, labels, values);
    }
}

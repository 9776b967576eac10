//! Bounded rolling history for chart rendering.

use std::collections::VecDeque;

use serde::Serialize;

use super::reading::{Channel, SensorReading};
use crate::surface::Surface;

/// Number of points kept per channel.
pub const SERIES_CAPACITY: usize = 20;

/// A single charted point: a local time label and a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Rolling window of points for one channel.
///
/// Appends at the tail and evicts from the head once `capacity` is
/// exceeded. Points are never modified after insertion.
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    channel: Channel,
    capacity: usize,
    points: VecDeque<SeriesPoint>,
}

impl SeriesBuffer {
    /// Create an empty buffer with the default capacity.
    pub fn new(channel: Channel) -> Self {
        Self::with_capacity(channel, SERIES_CAPACITY)
    }

    pub fn with_capacity(channel: Channel, capacity: usize) -> Self {
        Self {
            channel,
            capacity: capacity.max(1),
            points: VecDeque::with_capacity(capacity + 1),
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Insert at the tail, evicting the oldest point if over capacity.
    pub fn append(&mut self, point: SeriesPoint) {
        self.points.push_back(point);
        if self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn points(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.back()
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.label.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Minimum and maximum value in the window.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.value).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Push the whole window to the chart surface in one non-animated refresh.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.refresh_chart(self.channel, self.labels(), self.values());
    }
}

/// The three channel buffers, advanced together once per cycle.
#[derive(Debug, Clone)]
pub struct SeriesSet {
    buffers: [SeriesBuffer; 3],
}

impl Default for SeriesSet {
    fn default() -> Self {
        Self::new(SERIES_CAPACITY)
    }
}

impl SeriesSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffers: Channel::ALL.map(|c| SeriesBuffer::with_capacity(c, capacity)),
        }
    }

    /// Append one point per channel, all sharing `label`.
    pub fn append(&mut self, label: &str, reading: &SensorReading) {
        for buffer in &mut self.buffers {
            let value = reading.value(buffer.channel);
            buffer.append(SeriesPoint::new(label, value));
        }
    }

    pub fn get(&self, channel: Channel) -> &SeriesBuffer {
        // Buffers are stored in Channel::ALL order
        match channel {
            Channel::Vibration => &self.buffers[0],
            Channel::Strain => &self.buffers[1],
            Channel::Temperature => &self.buffers[2],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesBuffer> {
        self.buffers.iter()
    }

    /// Number of points per channel.
    pub fn len(&self) -> usize {
        self.buffers[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when every channel carries the same label at the same index.
    pub fn is_aligned(&self) -> bool {
        let reference = self.buffers[0].labels();
        self.buffers[1..].iter().all(|b| b.labels() == reference)
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        for buffer in &self.buffers {
            buffer.render(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::ScreenState;

    fn label(i: usize) -> String {
        format!("12:00:{:02}", i)
    }

    #[test]
    fn length_is_min_of_appends_and_capacity() {
        let mut buffer = SeriesBuffer::new(Channel::Vibration);
        for i in 0..30 {
            buffer.append(SeriesPoint::new(label(i), i as f64));
            assert_eq!(buffer.len(), (i + 1).min(SERIES_CAPACITY));
        }
    }

    #[test]
    fn eviction_keeps_most_recent_in_order() {
        let mut buffer = SeriesBuffer::new(Channel::Strain);
        for i in 0..25 {
            buffer.append(SeriesPoint::new(label(i), i as f64));
        }

        let expected: Vec<f64> = (5..25).map(|i| i as f64).collect();
        assert_eq!(buffer.values(), expected);
        assert_eq!(buffer.latest().unwrap().label, label(24));
        assert_eq!(buffer.points().next().unwrap().label, label(5));
    }

    #[test]
    fn bounds_track_window() {
        let mut buffer = SeriesBuffer::with_capacity(Channel::Temperature, 2);
        assert_eq!(buffer.bounds(), None);
        buffer.append(SeriesPoint::new("a", 40.0));
        buffer.append(SeriesPoint::new("b", 20.0));
        buffer.append(SeriesPoint::new("c", 30.0));
        assert_eq!(buffer.bounds(), Some((20.0, 30.0)));
    }

    #[test]
    fn set_appends_all_channels_with_shared_label() {
        let mut set = SeriesSet::default();
        set.append("12:00:00", &SensorReading::new(1.0, 0.3, 25.0));
        set.append("12:00:02", &SensorReading::new(1.2, 0.4, 26.0));

        assert_eq!(set.len(), 2);
        assert!(set.is_aligned());
        assert_eq!(set.get(Channel::Vibration).values(), vec![1.0, 1.2]);
        assert_eq!(set.get(Channel::Strain).values(), vec![0.3, 0.4]);
        assert_eq!(set.get(Channel::Temperature).values(), vec![25.0, 26.0]);
        assert_eq!(
            set.get(Channel::Temperature).labels(),
            vec!["12:00:00".to_string(), "12:00:02".to_string()]
        );
    }

    #[test]
    fn render_pushes_equal_length_sequences() {
        let mut set = SeriesSet::default();
        for i in 0..3 {
            set.append(&label(i), &SensorReading::new(i as f64, 0.1, 20.0));
        }

        let mut screen = ScreenState::new();
        set.render(&mut screen);

        for channel in Channel::ALL {
            let chart = screen.chart(channel);
            assert_eq!(chart.labels.len(), 3);
            assert_eq!(chart.values.len(), 3);
        }
        assert_eq!(screen.chart(Channel::Vibration).values, vec![0.0, 1.0, 2.0]);
    }
}

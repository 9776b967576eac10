//! The real-time dashboard loop.
//!
//! [`Dashboard`] owns every piece of mutable dashboard state: the three
//! series buffers, the connection monitor, the alert presenter, the
//! polling loop, the clock and the output surface. It never performs I/O
//! itself. A driver asks [`Dashboard::tick`] for due cycles, runs the
//! fetch, and hands the outcome back to [`Dashboard::complete`].
//!
//! ```text
//!   tick() ──▶ Cycle ──▶ driver fetches ──▶ complete(cycle, result)
//!                                               │
//!                    ┌──────────────────────────┼─────────────────────┐
//!                    ▼ Ok                       ▼ Ok                  ▼
//!              SeriesSet::append       AlertPresenter         ConnectionMonitor
//!              + chart refresh         (banner, borders)      (connected / on Err
//!                                                              disconnected only)
//! ```
//!
//! All mutations for a cycle are applied before the next poll timer is
//! armed, so cycles never interleave.

pub mod alert;
pub mod connection;
pub mod poller;

pub use alert::{AlertPresenter, AlertState, ALERT_DISPLAY};
pub use connection::{ConnectionMonitor, ConnectionState};
pub use poller::{Cycle, PollingLoop, POLL_INTERVAL};

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::data::{AlertLevel, Channel, SensorReading, SeriesSet, SERIES_CAPACITY};
use crate::source::FetchError;
use crate::surface::{Element, ScreenState, Surface};

/// Timing and capacity parameters for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    pub poll_interval: Duration,
    pub alert_duration: Duration,
    pub capacity: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            alert_duration: ALERT_DISPLAY,
            capacity: SERIES_CAPACITY,
        }
    }
}

/// Running totals for the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CycleStats {
    pub succeeded: u64,
    pub failed: u64,
    /// Failures where the backend could not be reached at all.
    pub unreachable: u64,
    pub warnings: u64,
    pub criticals: u64,
    pub anomalies: u64,
    pub last_error: Option<String>,
}

impl CycleStats {
    fn record_success(&mut self, reading: &SensorReading) {
        self.succeeded += 1;
        match reading.alert_level {
            Some(AlertLevel::Warning) => self.warnings += 1,
            Some(AlertLevel::Critical) => self.criticals += 1,
            _ => {}
        }
        if reading.is_anomaly == Some(true) {
            self.anomalies += 1;
        }
    }

    fn record_failure(&mut self, error: &FetchError) {
        self.failed += 1;
        if error.is_transport() {
            self.unreachable += 1;
        }
        self.last_error = Some(error.to_string());
    }
}

/// Dashboard context.
pub struct Dashboard<S: Surface = ScreenState> {
    clock: Box<dyn Clock>,
    surface: S,
    series: SeriesSet,
    connection: ConnectionMonitor,
    alerts: AlertPresenter,
    poller: PollingLoop,
    stats: CycleStats,
    latest: Option<SensorReading>,
    last_update: Option<String>,
    running: bool,
}

impl Dashboard<ScreenState> {
    /// Dashboard on the system clock writing into a fresh [`ScreenState`].
    pub fn with_defaults(config: DashboardConfig) -> Self {
        Self::new(config, Box::new(SystemClock), ScreenState::new())
    }
}

impl<S: Surface> Dashboard<S> {
    pub fn new(config: DashboardConfig, clock: Box<dyn Clock>, surface: S) -> Self {
        Self {
            clock,
            surface,
            series: SeriesSet::new(config.capacity),
            connection: ConnectionMonitor::new(),
            alerts: AlertPresenter::new(config.alert_duration),
            poller: PollingLoop::new(config.poll_interval),
            stats: CycleStats::default(),
            latest: None,
            last_update: None,
            running: false,
        }
    }

    /// Show the initial connection state and start polling.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.connection.show(&mut self.surface);
        let now = self.clock.now();
        if self.poller.is_visible() && self.poller.is_online() {
            self.poller.activate(now);
        }
    }

    /// Stop all timers. Cycles still in flight are discarded on completion.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        info!("dashboard shutting down");
        self.running = false;
        self.poller.shutdown();
        self.alerts.dismiss(&mut self.surface);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Cancel any pending poll and run a cycle immediately.
    pub fn activate(&mut self) {
        if !self.running {
            return;
        }
        let now = self.clock.now();
        self.poller.activate(now);
    }

    /// Stop polling until the next activation.
    pub fn deactivate(&mut self) {
        self.poller.deactivate();
    }

    /// The screen became visible or hidden.
    pub fn handle_visibility(&mut self, visible: bool) {
        if !self.running {
            return;
        }
        debug!(visible, "visibility changed");
        let now = self.clock.now();
        self.poller.set_visible(visible, now);
    }

    /// The network went online or offline.
    ///
    /// Going offline stops polling and shows disconnected right away.
    pub fn handle_network_change(&mut self, online: bool) {
        if !self.running {
            return;
        }
        let now = self.clock.now();
        if self.poller.set_online(online, now) {
            info!(online, "network state changed");
        }
        if !online {
            self.connection.set_connected(false, &mut self.surface);
        }
    }

    /// Expire timed effects and return a cycle if one is due.
    pub fn tick(&mut self) -> Option<Cycle> {
        let now = self.clock.now();
        self.alerts.tick(now, &mut self.surface);
        if !self.running {
            return None;
        }
        self.poller.poll(now)
    }

    /// Apply the outcome of `cycle`. Returns false if the cycle was stale.
    pub fn complete(&mut self, cycle: Cycle, result: Result<SensorReading, FetchError>) -> bool {
        if !self.poller.owns(cycle) {
            debug!(cycle = cycle.id, "dropping result of stale cycle");
            return false;
        }

        match result {
            Ok(reading) => self.apply_reading(reading),
            Err(error) => self.apply_failure(&error),
        }

        let now = self.clock.now();
        self.poller.finish(cycle, now)
    }

    fn apply_reading(&mut self, reading: SensorReading) {
        let now = self.clock.now();
        let label = self.clock.wall_clock().format("%H:%M:%S").to_string();

        // 1. Series buffers, all three together
        self.series.append(&label, &reading);
        self.series.render(&mut self.surface);
        for channel in Channel::ALL {
            let text = channel.format_value(reading.value(channel));
            self.surface.set_text(Element::Value(channel), text);
        }
        self.surface.set_text(Element::LastUpdate, label.clone());
        if let Some(score) = reading.anomaly_score {
            self.surface.set_text(Element::AnomalyScore, format!("{:.3}", score));
        }

        // 2. Alerts
        if let Some(level) = reading.alert_level {
            if !level.is_normal() {
                self.alerts.present(level, reading.messages(), now, &mut self.surface);
            }
            self.alerts.apply_level(level, &mut self.surface);
        }

        // 3. Connection
        self.connection.set_connected(true, &mut self.surface);

        self.stats.record_success(&reading);
        self.last_update = Some(label);
        self.latest = Some(reading);
    }

    fn apply_failure(&mut self, error: &FetchError) {
        warn!(error = %error, "fetch cycle failed");
        self.connection.set_connected(false, &mut self.surface);
        self.stats.record_failure(error);
    }

    /// Earliest instant at which `tick` has work to do.
    pub fn next_wakeup(&self) -> Option<Instant> {
        match (self.poller.next_due(), self.alerts.hides_at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn series(&self) -> &SeriesSet {
        &self.series
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn alert(&self) -> Option<&AlertState> {
        self.alerts.state()
    }

    pub fn is_alert_visible(&self) -> bool {
        self.alerts.is_visible()
    }

    /// Time left before the banner hides, if it is showing.
    pub fn alert_remaining(&self) -> Option<Duration> {
        self.alerts.remaining(self.clock.now())
    }

    /// Number of connected/disconnected flips since start.
    pub fn connection_changes(&self) -> u64 {
        self.connection.transitions()
    }

    pub fn poller(&self) -> &PollingLoop {
        &self.poller
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    pub fn latest(&self) -> Option<&SensorReading> {
        self.latest.as_ref()
    }

    pub fn last_update(&self) -> Option<&str> {
        self.last_update.as_deref()
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::surface::{RecordingSurface, Tone};
    use chrono::NaiveDate;

    fn setup() -> (ManualClock, Dashboard<RecordingSurface>) {
        let wall = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(9, 30, 0).unwrap();
        let clock = ManualClock::starting_at(wall);
        let mut dashboard = Dashboard::new(
            DashboardConfig::default(),
            Box::new(clock.clone()),
            RecordingSurface::default(),
        );
        dashboard.start();
        (clock, dashboard)
    }

    fn reading(vibration: f64) -> SensorReading {
        SensorReading::new(vibration, 0.3, 25.0)
    }

    /// Wait for the next cycle and complete it with `result`.
    fn run_cycle(
        clock: &ManualClock,
        dashboard: &mut Dashboard<RecordingSurface>,
        result: Result<SensorReading, FetchError>,
    ) {
        let cycle = loop {
            if let Some(cycle) = dashboard.tick() {
                break cycle;
            }
            clock.advance(Duration::from_millis(100));
        };
        assert!(dashboard.complete(cycle, result));
    }

    #[test]
    fn start_shows_disconnected_and_fetches_immediately() {
        let (_clock, mut dashboard) = setup();
        let screen = &dashboard.surface().screen;
        assert!(screen.is_visible(Element::StatusDisconnected));
        assert!(!screen.is_visible(Element::StatusConnected));
        assert!(dashboard.tick().is_some());
    }

    #[test]
    fn successful_cycles_fill_series_in_order() {
        let (clock, mut dashboard) = setup();
        for v in [1.0, 1.2, 0.9] {
            run_cycle(&clock, &mut dashboard, Ok(reading(v)));
        }

        let vibration = dashboard.series().get(Channel::Vibration);
        assert_eq!(vibration.values(), vec![1.0, 1.2, 0.9]);

        let labels = vibration.labels();
        assert_eq!(labels.len(), 3);
        assert!(labels[0] < labels[1] && labels[1] < labels[2]);
        assert_eq!(labels[0], "09:30:00");
        assert!(dashboard.series().is_aligned());
        assert_eq!(dashboard.connection(), ConnectionState::Connected);
        assert_eq!(dashboard.surface().screen.text(Element::LastUpdate), Some("09:30:04"));
    }

    #[test]
    fn series_length_is_capped() {
        let (clock, mut dashboard) = setup();
        for i in 0..25 {
            run_cycle(&clock, &mut dashboard, Ok(reading(i as f64)));
            assert_eq!(dashboard.series().len(), (i + 1).min(SERIES_CAPACITY));
        }
        assert_eq!(dashboard.series().get(Channel::Vibration).values()[0], 5.0);
    }

    #[test]
    fn cycles_are_spaced_by_interval() {
        let (clock, mut dashboard) = setup();
        let first = dashboard.tick().unwrap();
        dashboard.complete(first, Ok(reading(1.0)));

        clock.advance(Duration::from_millis(1_999));
        assert!(dashboard.tick().is_none());
        clock.advance(Duration::from_millis(1));
        assert!(dashboard.tick().is_some());
    }

    #[test]
    fn error_payload_leaves_buffers_and_disconnects() {
        let (clock, mut dashboard) = setup();
        run_cycle(&clock, &mut dashboard, Ok(reading(1.0)));
        let before = dashboard.series().get(Channel::Vibration).values();

        run_cycle(&clock, &mut dashboard, Err(FetchError::Remote("sensor offline".into())));

        for channel in Channel::ALL {
            assert_eq!(dashboard.series().get(channel).len(), 1);
        }
        assert_eq!(dashboard.series().get(Channel::Vibration).values(), before);
        assert_eq!(dashboard.connection(), ConnectionState::Disconnected);
        assert!(dashboard.surface().screen.is_visible(Element::StatusDisconnected));
        assert_eq!(dashboard.stats().failed, 1);
        assert_eq!(dashboard.stats().unreachable, 0);
        assert_eq!(dashboard.connection_changes(), 2);
        assert!(dashboard.stats().last_error.as_deref().unwrap().contains("sensor offline"));
    }

    #[test]
    fn failure_does_not_touch_alert_state() {
        let (clock, mut dashboard) = setup();
        let warn = reading(2.1).with_alert(AlertLevel::Warning, &["Vibration warning"]);
        run_cycle(&clock, &mut dashboard, Ok(warn));
        let tones_before = dashboard.surface().tone_calls.len();

        run_cycle(&clock, &mut dashboard, Err(FetchError::Status(500)));

        assert_eq!(dashboard.surface().tone_calls.len(), tones_before);
        assert_eq!(dashboard.alert().unwrap().level, AlertLevel::Warning);
    }

    #[test]
    fn failure_keeps_polling() {
        let (clock, mut dashboard) = setup();
        for _ in 0..3 {
            run_cycle(&clock, &mut dashboard, Err(FetchError::Timeout));
        }
        assert!(dashboard.poller().is_active());
        assert_eq!(dashboard.stats().failed, 3);
        assert_eq!(dashboard.stats().unreachable, 3);
        assert_eq!(dashboard.connection_changes(), 0);
        // Repeated failures emit no extra transitions
        assert_eq!(
            dashboard.surface().visibility_of(Element::StatusDisconnected),
            vec![true]
        );
    }

    #[test]
    fn critical_alert_styles_banner_and_cards() {
        let (clock, mut dashboard) = setup();
        let critical = reading(2.7).with_alert(AlertLevel::Critical, &["temp high", "strain high"]);
        run_cycle(&clock, &mut dashboard, Ok(critical));

        let screen = &dashboard.surface().screen;
        assert_eq!(screen.text(Element::AlertMessage), Some("temp high, strain high"));
        assert_eq!(screen.tone(Element::AlertBanner), Some(Tone::Danger));
        assert!(screen.is_visible(Element::AlertBanner));
        for card in Element::cards() {
            assert_eq!(screen.tone(card), Some(Tone::Danger));
        }
    }

    #[test]
    fn normal_level_restyles_cards_without_banner() {
        let (clock, mut dashboard) = setup();
        run_cycle(
            &clock,
            &mut dashboard,
            Ok(reading(1.0).with_alert(AlertLevel::Normal, &[])),
        );

        let screen = &dashboard.surface().screen;
        assert!(!screen.is_visible(Element::AlertBanner));
        for card in Element::cards() {
            assert_eq!(screen.tone(card), Some(Tone::Success));
        }
    }

    #[test]
    fn absent_level_leaves_styling_untouched() {
        let (clock, mut dashboard) = setup();
        run_cycle(&clock, &mut dashboard, Ok(reading(1.0)));
        assert!(dashboard.surface().tone_calls.is_empty());
    }

    #[test]
    fn banner_expires_independent_of_fetches() {
        let (clock, mut dashboard) = setup();
        let warn = reading(2.1).with_alert(AlertLevel::Warning, &["Vibration warning"]);
        run_cycle(&clock, &mut dashboard, Ok(warn));
        let shown_at = clock.elapsed();

        // Normal readings keep arriving every 2s
        while clock.elapsed() < shown_at + Duration::from_millis(9_900) {
            if let Some(cycle) = dashboard.tick() {
                dashboard.complete(cycle, Ok(reading(1.0).with_alert(AlertLevel::Normal, &[])));
            }
            assert!(dashboard.is_alert_visible());
            clock.advance(Duration::from_millis(100));
        }

        clock.advance(Duration::from_millis(100));
        dashboard.tick();
        assert!(!dashboard.is_alert_visible());
        assert!(!dashboard.surface().screen.is_visible(Element::AlertBanner));
    }

    #[test]
    fn hidden_then_shown_fetches_once_immediately() {
        let (clock, mut dashboard) = setup();
        run_cycle(&clock, &mut dashboard, Ok(reading(1.0)));

        dashboard.handle_visibility(false);
        for _ in 0..100 {
            clock.advance(Duration::from_millis(500));
            assert!(dashboard.tick().is_none());
        }

        dashboard.handle_visibility(true);
        let cycle = dashboard.tick().expect("immediate fetch on show");
        assert!(dashboard.tick().is_none());
        dashboard.complete(cycle, Ok(reading(1.1)));
        assert_eq!(dashboard.series().len(), 2);
    }

    #[test]
    fn in_flight_cycle_applies_after_hide() {
        let (_clock, mut dashboard) = setup();
        let cycle = dashboard.tick().unwrap();
        dashboard.handle_visibility(false);

        assert!(dashboard.complete(cycle, Ok(reading(1.0))));
        assert_eq!(dashboard.series().len(), 1);
        assert_eq!(dashboard.next_wakeup(), None);
    }

    #[test]
    fn offline_disconnects_immediately_and_stops_polling() {
        let (clock, mut dashboard) = setup();
        run_cycle(&clock, &mut dashboard, Ok(reading(1.0)));
        assert_eq!(dashboard.connection(), ConnectionState::Connected);

        dashboard.handle_network_change(false);
        assert_eq!(dashboard.connection(), ConnectionState::Disconnected);
        clock.advance(Duration::from_secs(10));
        assert!(dashboard.tick().is_none());

        dashboard.handle_network_change(true);
        assert!(dashboard.tick().is_some());
    }

    #[test]
    fn activate_while_active_restarts_immediately() {
        let (clock, mut dashboard) = setup();
        run_cycle(&clock, &mut dashboard, Ok(reading(1.0)));
        clock.advance(Duration::from_millis(300));

        dashboard.activate();
        assert!(dashboard.tick().is_some());
    }

    #[test]
    fn shown_during_in_flight_cycle_fetches_right_after_completion() {
        let (clock, mut dashboard) = setup();
        let cycle = dashboard.tick().unwrap();

        clock.advance(Duration::from_millis(300));
        dashboard.handle_visibility(false);
        dashboard.handle_visibility(true);
        clock.advance(Duration::from_millis(200));
        assert!(dashboard.tick().is_none());

        assert!(dashboard.complete(cycle, Ok(reading(1.0))));
        let next = dashboard.tick().expect("fetch right after the in-flight cycle");
        assert_eq!(next.id, cycle.id + 1);

        // Regular cadence resumes afterwards
        dashboard.complete(next, Ok(reading(1.1)));
        clock.advance(Duration::from_millis(1_999));
        assert!(dashboard.tick().is_none());
        clock.advance(Duration::from_millis(1));
        assert!(dashboard.tick().is_some());
    }

    #[test]
    fn activate_during_in_flight_cycle_fetches_right_after_completion() {
        let (clock, mut dashboard) = setup();
        let cycle = dashboard.tick().unwrap();

        clock.advance(Duration::from_millis(400));
        dashboard.activate();
        assert!(dashboard.tick().is_none());

        dashboard.complete(cycle, Err(FetchError::Timeout));
        assert!(dashboard.tick().is_some());
    }

    #[test]
    fn next_wakeup_tracks_poll_and_banner() {
        let (clock, mut dashboard) = setup();
        assert_eq!(dashboard.next_wakeup(), Some(clock.now()));

        let warn = reading(2.1).with_alert(AlertLevel::Warning, &["w"]);
        let cycle = dashboard.tick().unwrap();
        assert_eq!(dashboard.next_wakeup(), None);
        dashboard.complete(cycle, Ok(warn));
        assert_eq!(dashboard.next_wakeup(), Some(clock.now() + POLL_INTERVAL));
        assert_eq!(dashboard.alert_remaining(), Some(ALERT_DISPLAY));

        dashboard.handle_visibility(false);
        assert_eq!(dashboard.next_wakeup(), Some(clock.now() + ALERT_DISPLAY));
    }

    #[test]
    fn shutdown_cancels_timers_and_drops_in_flight() {
        let (clock, mut dashboard) = setup();
        let warn = reading(2.1).with_alert(AlertLevel::Warning, &["w"]);
        run_cycle(&clock, &mut dashboard, Ok(warn));
        clock.advance(Duration::from_secs(2));
        let cycle = dashboard.tick().unwrap();

        dashboard.shutdown();
        assert!(!dashboard.complete(cycle, Ok(reading(3.0))));
        assert_eq!(dashboard.series().len(), 1);
        assert_eq!(dashboard.next_wakeup(), None);
        assert!(!dashboard.is_alert_visible());
        assert!(!dashboard.surface().screen.is_visible(Element::AlertBanner));
        clock.advance(Duration::from_secs(60));
        assert!(dashboard.tick().is_none());
    }

    #[test]
    fn stats_count_levels_and_anomalies() {
        let (clock, mut dashboard) = setup();
        let mut anomalous = reading(2.6).with_alert(AlertLevel::Critical, &["c"]);
        anomalous.is_anomaly = Some(true);
        anomalous.anomaly_score = Some(-0.2134);
        run_cycle(&clock, &mut dashboard, Ok(anomalous));
        run_cycle(&clock, &mut dashboard, Ok(reading(2.1).with_alert(AlertLevel::Warning, &["w"])));

        let stats = dashboard.stats();
        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.criticals, 1);
        assert_eq!(stats.warnings, 1);
        assert_eq!(stats.anomalies, 1);
        assert_eq!(dashboard.surface().screen.text(Element::AnomalyScore), Some("-0.213"));
    }
}

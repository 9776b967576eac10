//! Application state and the bridge between the dashboard and the runtime.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use serde_json::json;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

use crate::dashboard::{Cycle, Dashboard, DashboardConfig};
use crate::data::{Channel, SensorReading};
use crate::source::{FetchError, Fetcher};
use crate::ui::Theme;

type CycleOutcome = (Cycle, Result<SensorReading, FetchError>);

/// How long a status bar message stays up.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    pub dashboard: Dashboard,
    fetcher: Arc<dyn Fetcher>,
    runtime: Handle,
    results_tx: mpsc::UnboundedSender<CycleOutcome>,
    results_rx: mpsc::UnboundedReceiver<CycleOutcome>,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with a theme matched to the terminal background.
    pub fn new(fetcher: Arc<dyn Fetcher>, config: DashboardConfig, runtime: Handle) -> Self {
        Self::with_theme(fetcher, config, runtime, Theme::auto_detect())
    }

    pub fn with_theme(
        fetcher: Arc<dyn Fetcher>,
        config: DashboardConfig,
        runtime: Handle,
        theme: Theme,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            show_help: false,
            dashboard: Dashboard::with_defaults(config),
            fetcher,
            runtime,
            results_tx,
            results_rx,
            theme,
            status_message: None,
        }
    }

    /// Show the initial state and begin polling.
    pub fn start(&mut self) {
        self.dashboard.start();
        self.pump();
    }

    /// Returns a description of the current backend.
    pub fn source_description(&self) -> &str {
        self.fetcher.description()
    }

    /// Apply finished cycles, expire timers, and launch a due cycle.
    ///
    /// Returns the number of cycle results applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok((cycle, result)) = self.results_rx.try_recv() {
            if self.dashboard.complete(cycle, result) {
                applied += 1;
            }
        }

        if let Some(cycle) = self.dashboard.tick() {
            self.spawn_cycle(cycle);
        }
        applied
    }

    /// How long the event loop may block before `pump` has timed work.
    ///
    /// Capped at `max` so finished fetches are picked up promptly.
    pub fn poll_timeout(&self, max: Duration) -> Duration {
        match self.dashboard.next_wakeup() {
            Some(at) => at.saturating_duration_since(self.dashboard.now()).min(max),
            None => max,
        }
    }

    fn spawn_cycle(&self, cycle: Cycle) {
        debug!(cycle = cycle.id, source = self.fetcher.description(), "spawning fetch");
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.results_tx.clone();
        self.runtime.spawn(async move {
            let result = fetcher.fetch().await;
            // Receiver gone means the app is shutting down
            let _ = tx.send((cycle, result));
        });
    }

    /// True while polling is paused by the user or by lost focus.
    pub fn is_paused(&self) -> bool {
        !self.dashboard.poller().is_visible()
    }

    pub fn is_offline(&self) -> bool {
        !self.dashboard.poller().is_online()
    }

    /// Pause or resume polling, as if the screen were hidden or shown.
    pub fn toggle_pause(&mut self) {
        let paused = self.is_paused();
        self.dashboard.handle_visibility(paused);
        self.set_status_message(if paused { "Resumed" } else { "Paused" }.to_string());
    }

    /// Simulate the network going offline or coming back.
    pub fn toggle_network(&mut self) {
        let offline = self.is_offline();
        self.dashboard.handle_network_change(offline);
        self.set_status_message(
            if offline { "Network online" } else { "Network offline" }.to_string(),
        );
    }

    /// Fetch now, restarting the poll cadence. Resumes a paused dashboard.
    pub fn refresh(&mut self) {
        if self.is_paused() {
            self.dashboard.handle_visibility(true);
        } else {
            self.dashboard.activate();
        }
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Stop timers and signal the application to quit.
    pub fn quit(&mut self) {
        self.dashboard.shutdown();
        self.running = false;
    }

    /// Export current series, alert, connection and stats to a file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        let series: serde_json::Map<String, serde_json::Value> = Channel::ALL
            .iter()
            .map(|&channel| {
                let points: Vec<_> = self.dashboard.series().get(channel).points().collect();
                (channel.title().to_lowercase(), json!(points))
            })
            .collect();

        let export = json!({
            "source": self.source_description(),
            "connection": self.dashboard.connection(),
            "connection_changes": self.dashboard.connection_changes(),
            "last_update": self.dashboard.last_update(),
            "latest": self.dashboard.latest(),
            "alert": self.dashboard.alert(),
            "alert_visible": self.dashboard.is_alert_visible(),
            "stats": self.dashboard.stats(),
            "series": series,
        });

        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

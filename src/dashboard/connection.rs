//! Connection indicator.

use serde::Serialize;
use tracing::info;

use crate::surface::{Element, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connected => "Connected",
            ConnectionState::Disconnected => "Disconnected",
        }
    }
}

/// Edge-triggered connection indicator.
///
/// Exactly one of `status-connected` / `status-disconnected` is visible
/// once [`ConnectionMonitor::show`] has run. Repeated identical updates
/// produce no surface calls.
#[derive(Debug, Clone)]
pub struct ConnectionMonitor {
    state: ConnectionState,
    transitions: u64,
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionMonitor {
    /// Starts disconnected until the first cycle succeeds.
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            transitions: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Number of visible transitions emitted so far.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Write the current state to the surface unconditionally.
    pub fn show(&self, surface: &mut dyn Surface) {
        let connected = self.is_connected();
        surface.set_visible(Element::StatusConnected, connected);
        surface.set_visible(Element::StatusDisconnected, !connected);
    }

    /// Update the state. Returns true if a visible change was emitted.
    pub fn set_connected(&mut self, connected: bool, surface: &mut dyn Surface) -> bool {
        let next = if connected {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        };
        if next == self.state {
            return false;
        }

        info!(from = self.state.label(), to = next.label(), "connection state changed");
        self.state = next;
        self.transitions += 1;
        self.show(surface);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    #[test]
    fn show_makes_exactly_one_indicator_visible() {
        let monitor = ConnectionMonitor::new();
        let mut surface = RecordingSurface::default();
        monitor.show(&mut surface);

        assert!(!surface.screen.is_visible(Element::StatusConnected));
        assert!(surface.screen.is_visible(Element::StatusDisconnected));
    }

    #[test]
    fn repeated_identical_updates_emit_once() {
        let mut monitor = ConnectionMonitor::new();
        let mut surface = RecordingSurface::default();

        assert!(monitor.set_connected(true, &mut surface));
        assert!(!monitor.set_connected(true, &mut surface));

        assert_eq!(monitor.transitions(), 1);
        assert_eq!(surface.visibility_of(Element::StatusConnected), vec![true]);
        assert_eq!(surface.visibility_of(Element::StatusDisconnected), vec![false]);
    }

    #[test]
    fn emits_only_on_change() {
        let mut monitor = ConnectionMonitor::new();
        let mut surface = RecordingSurface::default();

        let sequence = [false, true, true, false, false, false, true];
        let emitted: Vec<bool> =
            sequence.iter().map(|&c| monitor.set_connected(c, &mut surface)).collect();

        assert_eq!(emitted, vec![false, true, false, true, false, false, true]);
        assert_eq!(monitor.transitions(), 3);
        assert!(surface.screen.is_visible(Element::StatusConnected));
        assert!(!surface.screen.is_visible(Element::StatusDisconnected));
    }
}

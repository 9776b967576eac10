//! Polling loop scheduling and gating.
//!
//! The loop is active while the screen is visible and the network is
//! online. Activation arms the poll timer for an immediate cycle; each
//! completed cycle re-arms it one interval later. At most one timer and at
//! most one cycle are live at any moment.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::clock::Timer;

/// Default cadence between cycles.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2_000);

/// Handle for one fetch-and-apply iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    pub id: u64,
    pub started_at: Instant,
}

#[derive(Debug, Clone)]
pub struct PollingLoop {
    interval: Duration,
    visible: bool,
    online: bool,
    active: bool,
    timer: Timer,
    in_flight: Option<Cycle>,
    next_id: u64,
}

impl Default for PollingLoop {
    fn default() -> Self {
        Self::new(POLL_INTERVAL)
    }
}

impl PollingLoop {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            visible: true,
            online: true,
            active: false,
            timer: Timer::new(),
            in_flight: None,
            next_id: 1,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn in_flight(&self) -> Option<Cycle> {
        self.in_flight
    }

    /// When the next cycle is due, if one is scheduled.
    pub fn next_due(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Start (or restart) polling with an immediate cycle.
    ///
    /// Any pending timer is cancelled first. If a cycle is already in
    /// flight, its completion schedules the next one instead.
    pub fn activate(&mut self, now: Instant) {
        if !self.active {
            info!("polling activated");
        }
        self.active = true;
        self.timer.cancel();
        self.timer.arm(now);
    }

    /// Stop polling. Returns false if already inactive.
    pub fn deactivate(&mut self) -> bool {
        if !self.active {
            return false;
        }
        info!("polling deactivated");
        self.active = false;
        self.timer.cancel();
        true
    }

    /// Screen shown or hidden.
    pub fn set_visible(&mut self, visible: bool, now: Instant) {
        self.visible = visible;
        if !visible {
            self.deactivate();
        } else if self.online {
            self.activate(now);
        }
    }

    /// Network online/offline signal. Returns true if the state changed.
    pub fn set_online(&mut self, online: bool, now: Instant) -> bool {
        if online == self.online {
            return false;
        }
        self.online = online;
        if !online {
            self.deactivate();
        } else if self.visible {
            self.activate(now);
        }
        true
    }

    /// Begin a cycle if one is due.
    pub fn poll(&mut self, now: Instant) -> Option<Cycle> {
        if !self.active || self.in_flight.is_some() {
            return None;
        }
        if !self.timer.fire(now) {
            return None;
        }

        let cycle = Cycle {
            id: self.next_id,
            started_at: now,
        };
        self.next_id += 1;
        self.in_flight = Some(cycle);
        debug!(cycle = cycle.id, "cycle started");
        Some(cycle)
    }

    /// True if `cycle` is the one currently in flight.
    pub fn owns(&self, cycle: Cycle) -> bool {
        self.in_flight.map(|c| c.id) == Some(cycle.id)
    }

    /// Mark `cycle` finished and schedule the next one if still active.
    ///
    /// A reactivation that happened while the cycle was in flight keeps its
    /// immediate deadline instead of waiting a full interval.
    ///
    /// Returns false for a cycle this loop is not waiting on.
    pub fn finish(&mut self, cycle: Cycle, now: Instant) -> bool {
        if !self.owns(cycle) {
            return false;
        }
        self.in_flight = None;
        // An activation during the cycle left an already-due deadline; keep it
        if self.active && self.timer.deadline().map_or(true, |due| due > now) {
            self.timer.cancel();
            self.timer.arm_after(now, self.interval);
        }
        true
    }

    /// Stop for good: cancel the timer and forget any cycle in flight.
    pub fn shutdown(&mut self) {
        self.active = false;
        self.timer.cancel();
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};

    #[test]
    fn activation_runs_immediately_then_every_interval() {
        let clock = ManualClock::default();
        let mut poller = PollingLoop::default();
        poller.activate(clock.now());

        let first = poller.poll(clock.now()).expect("immediate cycle");
        assert!(poller.poll(clock.now()).is_none());
        assert!(poller.finish(first, clock.now()));

        clock.advance(Duration::from_millis(1_999));
        assert!(poller.poll(clock.now()).is_none());
        clock.advance(Duration::from_millis(1));
        let second = poller.poll(clock.now()).expect("cycle after interval");
        assert_eq!(second.id, first.id + 1);
    }

    #[test]
    fn no_overlap_while_in_flight() {
        let clock = ManualClock::default();
        let mut poller = PollingLoop::default();
        poller.activate(clock.now());
        let cycle = poller.poll(clock.now()).unwrap();

        poller.activate(clock.now());
        clock.advance(Duration::from_secs(30));
        assert!(poller.poll(clock.now()).is_none());

        poller.finish(cycle, clock.now());
        assert_eq!(poller.next_due(), Some(clock.now() - Duration::from_secs(30)));
        let next = poller.poll(clock.now()).expect("activation during cycle runs next");
        assert_eq!(next.id, cycle.id + 1);

        poller.finish(next, clock.now());
        assert_eq!(poller.next_due(), Some(clock.now() + POLL_INTERVAL));
    }

    #[test]
    fn reactivation_replaces_pending_timer() {
        let clock = ManualClock::default();
        let mut poller = PollingLoop::default();
        poller.activate(clock.now());
        let cycle = poller.poll(clock.now()).unwrap();
        poller.finish(cycle, clock.now());

        clock.advance(Duration::from_millis(500));
        poller.activate(clock.now());
        assert_eq!(poller.next_due(), Some(clock.now()));
        assert!(poller.poll(clock.now()).is_some());
    }

    #[test]
    fn deactivate_when_inactive_is_noop() {
        let mut poller = PollingLoop::default();
        assert!(!poller.deactivate());
        assert!(!poller.is_active());
    }

    #[test]
    fn hidden_loop_never_polls() {
        let clock = ManualClock::default();
        let mut poller = PollingLoop::default();
        poller.activate(clock.now());
        poller.set_visible(false, clock.now());

        clock.advance(Duration::from_secs(60));
        assert!(poller.poll(clock.now()).is_none());
        assert_eq!(poller.next_due(), None);
    }

    #[test]
    fn finish_after_hide_does_not_rearm() {
        let clock = ManualClock::default();
        let mut poller = PollingLoop::default();
        poller.activate(clock.now());
        let cycle = poller.poll(clock.now()).unwrap();

        poller.set_visible(false, clock.now());
        assert!(poller.finish(cycle, clock.now()));
        assert_eq!(poller.next_due(), None);
    }

    #[test]
    fn offline_then_online_reactivates() {
        let clock = ManualClock::default();
        let mut poller = PollingLoop::default();
        poller.activate(clock.now());

        assert!(poller.set_online(false, clock.now()));
        assert!(!poller.set_online(false, clock.now()));
        assert!(!poller.is_active());

        assert!(poller.set_online(true, clock.now()));
        assert!(poller.is_active());
        assert!(poller.poll(clock.now()).is_some());
    }

    #[test]
    fn online_while_hidden_stays_inactive() {
        let clock = ManualClock::default();
        let mut poller = PollingLoop::default();
        poller.set_visible(false, clock.now());
        poller.set_online(false, clock.now());
        poller.set_online(true, clock.now());
        assert!(!poller.is_active());

        poller.set_visible(true, clock.now());
        assert!(poller.is_active());
    }

    #[test]
    fn stale_cycle_is_rejected() {
        let clock = ManualClock::default();
        let mut poller = PollingLoop::default();
        poller.activate(clock.now());
        let cycle = poller.poll(clock.now()).unwrap();
        poller.shutdown();

        assert!(!poller.finish(cycle, clock.now()));
        assert_eq!(poller.next_due(), None);
    }
}

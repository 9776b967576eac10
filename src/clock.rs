//! Time sources and cancellable timers.
//!
//! Every timed effect in the dashboard (the poll cadence, the alert banner
//! lifetime) owns a [`Timer`]. Timers never sleep on their own; the owner
//! asks [`Timer::fire`] with the current instant from a [`Clock`]. Tests
//! drive a [`ManualClock`] instead of waiting on the wall clock.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime};

/// A source of monotonic and wall-clock time.
pub trait Clock: Send + Debug {
    /// Monotonic instant used for scheduling.
    fn now(&self) -> Instant;

    /// Local wall-clock time used for labels.
    fn wall_clock(&self) -> NaiveDateTime;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_clock(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug)]
struct ManualState {
    origin: Instant,
    wall_origin: NaiveDateTime,
    elapsed: Duration,
}

/// A virtual clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can keep one handle
/// and give another to the component under test.
#[derive(Debug, Clone)]
pub struct ManualClock {
    state: Arc<Mutex<ManualState>>,
}

impl ManualClock {
    /// Create a clock frozen at the given wall-clock time.
    pub fn starting_at(wall_origin: NaiveDateTime) -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualState {
                origin: Instant::now(),
                wall_origin,
                elapsed: Duration::ZERO,
            })),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.elapsed += by;
    }

    /// Total time advanced since creation.
    pub fn elapsed(&self) -> Duration {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).elapsed
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(NaiveDateTime::default())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.origin + state.elapsed
    }

    fn wall_clock(&self) -> NaiveDateTime {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let elapsed = chrono::Duration::from_std(state.elapsed).unwrap_or(chrono::Duration::MAX);
        state
            .wall_origin
            .checked_add_signed(elapsed)
            .unwrap_or(NaiveDateTime::MAX)
    }
}

/// A cancellable one-shot deadline.
///
/// At most one deadline is live per timer: arming an armed timer replaces
/// the previous deadline.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    /// Create a disarmed timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to fire at `at`, replacing any pending deadline.
    pub fn arm(&mut self, at: Instant) {
        self.deadline = Some(at);
    }

    /// Arm the timer to fire `delay` after `now`.
    pub fn arm_after(&mut self, now: Instant, delay: Duration) {
        self.arm(now + delay);
    }

    /// Cancel the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline, `None` when disarmed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Returns true (and disarms) if the deadline has been reached.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

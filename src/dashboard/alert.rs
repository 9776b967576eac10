//! Alert banner and card border styling.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::clock::Timer;
use crate::data::AlertLevel;
use crate::surface::{Element, Surface, Tone};

/// How long a banner stays visible after it is shown.
pub const ALERT_DISPLAY: Duration = Duration::from_millis(10_000);

/// The banner currently (or most recently) presented.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertState {
    pub level: AlertLevel,
    pub messages: Vec<String>,
    /// `None` once the banner has been hidden.
    #[serde(skip)]
    pub visible_until: Option<Instant>,
}

impl AlertState {
    /// Messages joined into the single line shown in the banner.
    pub fn text(&self) -> String {
        banner_text(self.level, &self.messages)
    }
}

fn banner_text(level: AlertLevel, messages: &[String]) -> String {
    if messages.is_empty() {
        return format!("{} alert", capitalize(level.label()));
    }
    messages.join(", ")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Banner tone for a non-normal level.
pub fn banner_tone(level: AlertLevel) -> Tone {
    match level {
        AlertLevel::Critical => Tone::Danger,
        _ => Tone::Warning,
    }
}

/// Card border tone for any level.
pub fn border_tone(level: AlertLevel) -> Tone {
    match level {
        AlertLevel::Normal => Tone::Success,
        AlertLevel::Warning => Tone::Warning,
        AlertLevel::Critical => Tone::Danger,
    }
}

/// Presents alert banners and card styling.
///
/// Each [`present`](AlertPresenter::present) call restarts the single hide
/// timer, so an older banner's expiry can never hide a newer one.
#[derive(Debug, Clone)]
pub struct AlertPresenter {
    display_for: Duration,
    state: Option<AlertState>,
    hide_timer: Timer,
}

impl Default for AlertPresenter {
    fn default() -> Self {
        Self::new(ALERT_DISPLAY)
    }
}

impl AlertPresenter {
    pub fn new(display_for: Duration) -> Self {
        Self {
            display_for,
            state: None,
            hide_timer: Timer::new(),
        }
    }

    pub fn state(&self) -> Option<&AlertState> {
        self.state.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.hide_timer.is_armed()
    }

    /// Time the banner stays up from `now`, if it is showing.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.hide_timer.remaining(now)
    }

    /// Deadline of the pending hide, if a banner is showing.
    pub fn hides_at(&self) -> Option<Instant> {
        self.hide_timer.deadline()
    }

    /// Show the banner for a non-normal level.
    ///
    /// A normal level is ignored; banners only exist for warnings and
    /// critical readings.
    pub fn present(
        &mut self,
        level: AlertLevel,
        messages: &[String],
        now: Instant,
        surface: &mut dyn Surface,
    ) {
        if level.is_normal() {
            return;
        }

        let text = banner_text(level, messages);
        info!(level = level.label(), message = %text, "alert presented");

        surface.set_text(Element::AlertMessage, text);
        surface.set_tone(Element::AlertBanner, banner_tone(level));
        surface.set_visible(Element::AlertBanner, true);

        self.hide_timer.cancel();
        self.hide_timer.arm_after(now, self.display_for);
        self.state = Some(AlertState {
            level,
            messages: messages.to_vec(),
            visible_until: self.hide_timer.deadline(),
        });
    }

    /// Apply the border tone for `level` to every card.
    pub fn apply_level(&self, level: AlertLevel, surface: &mut dyn Surface) {
        let tone = border_tone(level);
        for card in Element::cards() {
            surface.set_tone(card, tone);
        }
    }

    /// Hide the banner if its timer has expired. Returns true if hidden.
    pub fn tick(&mut self, now: Instant, surface: &mut dyn Surface) -> bool {
        if !self.hide_timer.fire(now) {
            return false;
        }

        debug!("alert banner expired");
        surface.set_visible(Element::AlertBanner, false);
        if let Some(state) = self.state.as_mut() {
            state.visible_until = None;
        }
        true
    }

    /// Cancel any pending hide and take the banner down now.
    pub fn dismiss(&mut self, surface: &mut dyn Surface) {
        if !self.hide_timer.is_armed() {
            return;
        }
        self.hide_timer.cancel();
        surface.set_visible(Element::AlertBanner, false);
        if let Some(state) = self.state.as_mut() {
            state.visible_until = None;
        }
    }
}

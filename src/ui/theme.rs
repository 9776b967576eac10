//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::Channel;
use crate::surface::Tone;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warning tones.
    pub warning: Color,
    /// Color for danger tones.
    pub danger: Color,
    /// Color for success tones.
    pub success: Color,
    /// Color for untoned borders and separators.
    pub border: Color,
    /// Style for titles and section headers.
    pub header: Style,
    /// Line colors for the three channel charts.
    pub series: [Color; 3],
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            danger: Color::Red,
            success: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            series: [Color::LightCyan, Color::LightMagenta, Color::LightYellow],
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            danger: Color::Red,
            success: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            series: [Color::Blue, Color::Magenta, Color::Rgb(180, 100, 0)],
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a tone
    pub fn tone_style(&self, tone: Tone) -> Style {
        match tone {
            Tone::Success => Style::default().fg(self.success),
            Tone::Warning => Style::default().fg(self.warning),
            Tone::Danger => Style::default().fg(self.danger).add_modifier(Modifier::BOLD),
        }
    }

    /// Border style for an element that may not have a tone yet.
    pub fn border_style(&self, tone: Option<Tone>) -> Style {
        match tone {
            Some(tone) => self.tone_style(tone),
            None => Style::default().fg(self.border),
        }
    }

    /// Line color for a channel's chart.
    pub fn series_color(&self, channel: Channel) -> Color {
        match channel {
            Channel::Vibration => self.series[0],
            Channel::Strain => self.series[1],
            Channel::Temperature => self.series[2],
        }
    }
}

//! Terminal UI rendering using ratatui.
//!
//! Everything here reads the dashboard's retained [`ScreenState`] and
//! draws it; nothing in this module mutates dashboard state.
//!
//! ## Submodules
//!
//! - [`cards`]: Alert banner and the three reading cards
//! - [`charts`]: Rolling line charts, one per channel
//! - [`common`]: Shared components (header, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Alert banner (cards::render_banner)  │
//! ├────────────┬────────────┬────────────┤
//! │ Vibration  │ Strain     │ Temperature│  cards::render_cards
//! ├────────────┴────────────┴────────────┤
//! │ Charts (charts::render)              │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlay rendered on top:
//!    - common::render_help
//! ```
//!
//! [`ScreenState`]: crate::surface::ScreenState

pub mod cards;
pub mod charts;
pub mod common;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::surface::Element;

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 20;

/// Draw one full frame.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.warning));
        let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5.min(area.height));
        frame.render_widget(paragraph, centered);
        return;
    }

    let screen = app.dashboard.surface();
    let banner_height = if screen.is_visible(Element::AlertBanner) { 3 } else { 0 };
    let chunks = Layout::vertical([
        Constraint::Length(1),             // Header bar
        Constraint::Length(banner_height), // Alert banner
        Constraint::Length(5),             // Cards
        Constraint::Min(8),                // Charts
        Constraint::Length(1),             // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    cards::render_banner(frame, app, chunks[1]);
    cards::render_cards(frame, app, chunks[2]);
    charts::render(frame, app, chunks[3]);
    common::render_status_bar(frame, app, chunks[4]);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

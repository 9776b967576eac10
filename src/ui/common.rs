//! Common UI components shared across the screen.
//!
//! This module contains the header bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::dashboard::ConnectionState;
use crate::data::duration::format_duration;
use crate::surface::{Element, Tone};

/// Render the header bar with the connection indicator.
///
/// Displays: connection status, last update time, anomaly score.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let screen = app.dashboard.surface();

    let (status_label, status_style) = if screen.is_visible(Element::StatusConnected) {
        ("Connected", app.theme.tone_style(Tone::Success))
    } else {
        ("Disconnected", app.theme.tone_style(Tone::Danger))
    };

    let mut spans = vec![
        Span::styled(" ● ", status_style),
        Span::styled("SHM MONITOR ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(status_label, status_style),
        Span::raw(" │ Last update: "),
        Span::styled(
            screen.text(Element::LastUpdate).unwrap_or("--:--:--").to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(score) = screen.text(Element::AnomalyScore) {
        spans.push(Span::raw(" │ Anomaly score: "));
        spans.push(Span::raw(score.to_string()));
    }

    if app.is_paused() {
        spans.push(Span::styled(" │ PAUSED", app.theme.tone_style(Tone::Warning)));
    }
    if app.is_offline() {
        spans.push(Span::styled(" │ OFFLINE", app.theme.tone_style(Tone::Danger)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, cadence, cycle counts, available controls.
/// Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let stats = app.dashboard.stats();
    let mut status = format!(
        " {} | every {} | ok:{} fail:{} warn:{} crit:{}",
        app.source_description(),
        format_duration(app.dashboard.poller().interval()),
        stats.succeeded,
        stats.failed,
        stats.warnings,
        stats.criticals,
    );

    if app.dashboard.connection() == ConnectionState::Disconnected {
        if let Some(err) = &stats.last_error {
            status.push_str(&format!(" | {}", err));
        }
    }
    status.push_str(" | p:pause n:network r:refresh e:export ?:help q:quit");

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Polling",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Refresh now"),
        Line::from("  p         Pause / resume"),
        Line::from("  n         Toggle network offline"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  e         Export to JSON"),
        Line::from("  ?         Toggle help"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 16u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

//! Alert banner and per-channel reading cards.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::Channel;
use crate::surface::{Element, Tone};

/// Render the alert banner, if it is visible.
pub fn render_banner(frame: &mut Frame, app: &App, area: Rect) {
    let screen = app.dashboard.surface();
    if area.height == 0 || !screen.is_visible(Element::AlertBanner) {
        return;
    }

    let tone = screen.tone(Element::AlertBanner).unwrap_or(Tone::Warning);
    let style = app.theme.tone_style(tone);
    let label = match tone {
        Tone::Danger => "CRITICAL",
        _ => "WARNING",
    };
    let title = match app.dashboard.alert_remaining() {
        Some(left) => format!(" {} ({}s) ", label, left.as_secs_f64().ceil() as u64),
        None => format!(" {} ", label),
    };

    let block = Block::default()
        .title(Span::styled(title, style.add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(style);

    let message = screen.text(Element::AlertMessage).unwrap_or_default();
    let paragraph = Paragraph::new(Line::from(Span::styled(format!(" {}", message), style)))
        .block(block);

    frame.render_widget(paragraph, area);
}

/// Render the three reading cards side by side.
///
/// Card borders take the tone of the latest alert level.
pub fn render_cards(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    for (channel, column) in Channel::ALL.iter().zip(columns.iter()) {
        render_card(frame, app, *channel, *column);
    }
}

fn render_card(frame: &mut Frame, app: &App, channel: Channel, area: Rect) {
    let screen = app.dashboard.surface();
    let border_style = app.theme.border_style(screen.tone(Element::Card(channel)));

    let block = Block::default()
        .title(format!(" {} ", channel.title()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(border_style);

    let value = screen.text(Element::Value(channel)).unwrap_or("--");
    let points = app.dashboard.series().get(channel).len();

    let lines = vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default()
                .fg(app.theme.series_color(channel))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} pts", points),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

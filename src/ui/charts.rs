//! Rolling line charts, one per channel.
//!
//! Charts are redrawn from the retained chart series on every frame, with
//! no easing between refreshes.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::Channel;
use crate::surface::ChartData;

/// Render all three charts stacked vertically.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    for (channel, row) in Channel::ALL.iter().zip(rows.iter()) {
        render_chart(frame, app, *channel, *row);
    }
}

fn render_chart(frame: &mut Frame, app: &App, channel: Channel, area: Rect) {
    let chart_data = app.dashboard.surface().chart(channel);
    let color = app.theme.series_color(channel);

    let block = Block::default()
        .title(format!(" {} ", channel.title()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if chart_data.values.is_empty() {
        let paragraph = Paragraph::new(Span::styled(
            " Waiting for data...",
            Style::default().add_modifier(Modifier::DIM),
        ))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let points: Vec<(f64, f64)> = chart_data
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points);

    let x_max = (points.len().saturating_sub(1)).max(1) as f64;
    let (y_min, y_max) = y_bounds(app.dashboard.series().get(channel).bounds());

    let x_labels = x_axis_labels(chart_data);
    let y_labels = vec![
        Span::raw(format!("{:.2}", y_min)),
        Span::raw(format!("{:.2}", y_max)),
    ];

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

/// First and last time labels of the window.
fn x_axis_labels(data: &ChartData) -> Vec<Span<'static>> {
    match (data.labels.first(), data.labels.last()) {
        (Some(first), Some(last)) if data.labels.len() > 1 => {
            vec![Span::raw(first.clone()), Span::raw(last.clone())]
        }
        (Some(only), _) => vec![Span::raw(only.clone())],
        _ => Vec::new(),
    }
}

/// Y bounds with 10% headroom; flat series get a unit-wide band.
fn y_bounds(window: Option<(f64, f64)>) -> (f64, f64) {
    let Some((lo, hi)) = window.filter(|(lo, hi)| lo.is_finite() && hi.is_finite()) else {
        return (0.0, 1.0);
    };
    let span = hi - lo;
    if span <= f64::EPSILON {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = span * 0.1;
    (lo - pad, hi + pad)
}

//! Battery view: battery bank measurements.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::common::slot_line;
use crate::app::App;

/// Render the Battery view.
pub fn render(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let lines = vec![
        slot_line(app, "Voltage", "battery-voltage", now),
        slot_line(app, "Current", "battery-current", now),
        slot_line(app, "State of charge", "battery-soc", now),
        slot_line(app, "Temperature", "battery-temperature", now),
    ];

    let block = Block::default()
        .title(" Battery Bank ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

//! Chargers view: one panel per solar charge controller.

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::common::slot_line;
use crate::app::App;
use crate::data::SCC_COUNT;

/// Render the Chargers view: the controllers side by side.
pub fn render(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let constraints = vec![Constraint::Ratio(1, SCC_COUNT as u32); SCC_COUNT];
    let chunks = Layout::horizontal(constraints).split(area);

    for i in 1..=SCC_COUNT {
        render_controller(frame, app, chunks[i - 1], i, now);
    }
}

fn render_controller(frame: &mut Frame, app: &App, area: Rect, i: usize, now: Instant) {
    let lines = vec![
        slot_line(app, "Status", &format!("scc{i}-status"), now),
        slot_line(app, "Heartbeat", &format!("scc{i}-counter-heartbeat"), now),
        slot_line(app, "PV voltage", &format!("pv{i}-voltage"), now),
        slot_line(app, "PV current", &format!("pv{i}-current"), now),
        slot_line(app, "PV power", &format!("pv{i}-power"), now),
        slot_line(app, "Battery voltage", &format!("battery{i}-voltage"), now),
        slot_line(app, "Battery current", &format!("battery{i}-current"), now),
        slot_line(app, "Load voltage", &format!("load{i}-voltage"), now),
        slot_line(app, "Load current", &format!("load{i}-current"), now),
    ];

    let block = Block::default()
        .title(format!(" SCC {} ", i))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

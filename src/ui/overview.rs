//! Overview view: device information and the low-voltage-disconnect unit.

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::common::slot_line;
use crate::app::App;

/// Render the Overview view.
pub fn render(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let chunks = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_device_info(frame, app, chunks[0], now);
    render_lvd(frame, app, chunks[1], now);
}

fn render_device_info(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let lines = vec![
        slot_line(app, "Controller type", "scc-type", now),
        slot_line(app, "Disk usage", "disk-usage", now),
        slot_line(app, "Datalog entries", "datalog-length", now),
    ];

    let block = Block::default()
        .title(" Device Information ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_lvd(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let lines = vec![
        slot_line(app, "Heartbeat", "lvd-counter-heartbeat", now),
        slot_line(app, "VSAT line", "vsat-lvd", now),
        slot_line(app, "BTS line", "bts-lvd", now),
        slot_line(app, "System voltage", "system-voltage", now),
        slot_line(app, "MCB 1", "mcb1", now),
        slot_line(app, "MCB 2", "mcb2", now),
        slot_line(app, "MCB 3", "mcb3", now),
    ];

    let block = Block::default()
        .title(" Low-Voltage Disconnect ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

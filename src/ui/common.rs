//! Common UI components shared across views.
//!
//! This module contains the header bar, sidebar navigation, status bar,
//! notice toasts, and the help overlay.

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, ConnectionBadge, NoticeLevel, View};
use crate::data::Status;

/// Render the header bar: connection badge, site name, clock.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (badge_text, badge_style) = match app.connection_badge() {
        ConnectionBadge::Online => ("● Online", app.theme.status_style(Status::Active)),
        ConnectionBadge::Offline => ("● Offline", app.theme.status_style(Status::Danger)),
        ConnectionBadge::Polling => ("● Polling", app.theme.status_style(Status::Inactive)),
    };

    let clock = chrono::Local::now().format("%d/%m/%Y %H:%M:%S").to_string();

    let line = Line::from(vec![
        Span::styled(format!(" {} ", badge_text), badge_style),
        Span::raw("│ "),
        Span::styled(
            app.site_name.to_uppercase(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::raw(clock),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the sidebar navigation.
pub fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = [View::Overview, View::Chargers, View::Battery]
        .iter()
        .map(|view| {
            let style = if *view == app.current_view {
                app.theme.nav_active
            } else {
                app.theme.nav_inactive
            };
            ListItem::new(format!("  {}", view.label())).style(style)
        })
        .collect();

    let block = Block::default()
        .title(" Menu ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(List::new(items).block(block), area);
}

/// Render the status bar at the bottom.
///
/// Shows the active view, the attached sources, and available controls;
/// source errors take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(err) = app.source_error() {
        format!(" Error: {} | r:refresh q:quit", err)
    } else {
        let sources = app.source_descriptions().join(", ");
        format!(
            " {} | {} | Tab:switch r:refresh t:theme b:sidebar ?:help q:quit",
            app.current_view.label(),
            sources,
        )
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render notice toasts in the bottom-right corner, newest last.
pub fn render_notices(frame: &mut Frame, app: &App, area: Rect) {
    if app.notices.is_empty() {
        return;
    }

    for (i, notice) in app.notices.iter().rev().take(3).enumerate() {
        let width = (notice.message.len() as u16 + 4).min(area.width);
        let y = area.height.saturating_sub(2 + 3 * (i as u16 + 1));
        let toast_area = Rect::new(area.width.saturating_sub(width + 1), y, width, 3);

        let style = match notice.level {
            NoticeLevel::Info => Style::default().fg(app.theme.highlight),
            NoticeLevel::Error => Style::default().fg(app.theme.danger),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(style);

        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Paragraph::new(notice.message.as_str()).style(style).block(block),
            toast_area,
        );
    }
}

/// Render one labelled slot row: label, committed value, status indicator.
///
/// Shared by all views; freshness (a value committed within the restore
/// window) is highlighted with the theme's fresh style.
pub fn slot_line<'a>(app: &'a App, label: &str, slot: &str, now: Instant) -> Line<'a> {
    let text = app.board.text(slot).unwrap_or("-");

    let mut value_style = if app.board.text(slot).is_none() {
        Style::default().fg(app.theme.inactive)
    } else {
        Style::default()
    };
    // Two-phase transition: dim the old value while a write is staged,
    // highlight the new one briefly once it commits
    if app.board.is_staged(slot) {
        value_style = value_style.add_modifier(Modifier::DIM);
    } else if app.board.is_fresh(slot, now) {
        value_style = value_style.patch(app.theme.fresh);
    }

    let mut spans = vec![
        Span::styled(format!("{:<22}", label), Style::default().add_modifier(Modifier::DIM)),
        Span::styled(text, value_style),
    ];

    if let Some(status) = app.board.status(slot) {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("[{}]", status.symbol()),
            app.theme.status_style(status),
        ));
    }

    Line::from(spans)
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  Tab         Next view"),
        Line::from("  1/2/3       Overview / Chargers / Battery"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Refresh now"),
        Line::from("  t         Toggle light/dark theme"),
        Line::from("  b         Toggle sidebar"),
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

    let paragraph = Paragraph::new(help_text).block(block).alignment(Alignment::Left);

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 18u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

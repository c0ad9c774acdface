//! Login form rendering.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, LoginScreen};
use crate::login::LoginField;

/// Render the login form as a centered panel.
pub fn render(frame: &mut Frame, app: &App, screen: &LoginScreen, area: Rect) {
    let width = 46u16.min(area.width.saturating_sub(4));
    let height = 12u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let panel = Rect::new(x, y, width, height);

    let block = Block::default()
        .title(format!(" {}: Sign In ", app.site_name))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));
    let inner = block.inner(panel);

    frame.render_widget(Clear, panel);
    frame.render_widget(block, panel);

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(1),
    ])
    .split(inner);

    frame.render_widget(
        Paragraph::new("Enter your credentials").alignment(Alignment::Center),
        rows[0],
    );

    render_field(
        frame,
        app,
        rows[1],
        "Username",
        &screen.form.username,
        screen.form.focus == LoginField::Username,
    );
    render_field(
        frame,
        app,
        rows[2],
        "Password",
        &screen.form.password_display(),
        screen.form.focus == LoginField::Password,
    );

    let hint = if screen.form.submitting {
        Line::from(Span::styled(
            "Signing In…",
            Style::default().add_modifier(Modifier::DIM),
        ))
    } else {
        Line::from(Span::styled(
            "Enter:submit Tab:switch Esc:clear Ctrl-V:show",
            Style::default().add_modifier(Modifier::DIM),
        ))
    };
    frame.render_widget(Paragraph::new(hint).alignment(Alignment::Center), rows[4]);
}

fn render_field(frame: &mut Frame, app: &App, area: Rect, label: &str, value: &str, focused: bool) {
    let marker = if focused { "▸" } else { " " };
    let label_style = if focused {
        Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let cursor = if focused { "_" } else { "" };

    let line = Line::from(vec![
        Span::styled(format!("{} {:<10}", marker, label), label_style),
        Span::raw(format!("{}{}", value, cursor)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

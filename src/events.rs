use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, View};
use crate::login::LoginField;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent, now: Instant) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // The login gate captures all input while active
    if app.login.is_some() {
        handle_login_input(app, key, now);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Overview),
        KeyCode::Char('2') => app.set_view(View::Chargers),
        KeyCode::Char('3') => app.set_view(View::Battery),

        // Manual refresh
        KeyCode::Char('r') => app.refresh(now),

        // Sidebar
        KeyCode::Char('b') => app.toggle_sidebar(),

        // Theme
        KeyCode::Char('t') => app.toggle_theme(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle key input while the login form is shown
fn handle_login_input(app: &mut App, key: KeyEvent, now: Instant) {
    let Some(screen) = &mut app.login else {
        return;
    };

    match key.code {
        // Submit from the password field; advance from the username field
        KeyCode::Enter => {
            if screen.form.focus == LoginField::Username {
                screen.form.focus = LoginField::Password;
            } else {
                app.submit_login(now);
            }
        }

        // Move between fields
        KeyCode::Tab | KeyCode::Down | KeyCode::Up => screen.form.toggle_focus(),

        // Clear the form
        KeyCode::Esc => screen.form.clear(),

        // Password visibility
        KeyCode::Char('v') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            screen.form.toggle_show_password();
        }

        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Backspace => screen.form.pop_char(),

        // Type characters
        KeyCode::Char(c) => screen.form.push_char(c),

        _ => {}
    }
}

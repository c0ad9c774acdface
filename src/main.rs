// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing_subscriber::EnvFilter;

mod app;
mod data;
mod events;
mod login;
mod settings;
mod source;
mod ui;

use app::{App, View};
use settings::Settings;
use source::RestSource;
use ui::Preferences;

#[derive(Parser, Debug)]
#[command(name = "powerdesk")]
#[command(about = "Terminal dashboard for monitoring JSPro solar power installations")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the PowerDesk backend (overrides config)
    #[arg(short, long)]
    server: Option<String>,

    /// Poll interval in seconds (overrides config)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Websocket URL of the live push channel (overrides config)
    #[cfg(feature = "live")]
    #[arg(short, long)]
    live: Option<String>,

    /// Show the login form before the dashboard
    #[arg(long)]
    login: bool,

    /// Write logs to this file instead of the default location
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.log_file.clone())?;

    // Layered settings: file + environment, then CLI overrides
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(server) = args.server {
        settings.server = server;
    }
    if let Some(interval) = args.interval {
        settings.interval_secs = interval;
    }
    #[cfg(feature = "live")]
    if let Some(live) = args.live {
        settings.live_url = Some(live);
    }
    if args.login {
        settings.require_login = true;
    }

    // The TUI loop is synchronous; the runtime carries the pollers in the
    // background for the life of the session.
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let mut app = App::new(&settings, Preferences::open_default());

    let (rest, poller) = RestSource::spawn(&settings.server, settings.poll_interval());
    // Load initial data without waiting a full interval
    poller.refresh();
    app.attach_source(Box::new(rest));
    app.attach_poller(poller);

    #[cfg(feature = "live")]
    if let Some(ws_url) = &settings.live_url {
        let (live, events) = source::LiveSource::spawn(ws_url);
        app.attach_source(Box::new(live));
        app.attach_live(events);
    }

    run_tui(&mut app)
}

/// Route logs to a file; stdout belongs to the TUI.
fn init_tracing(log_file: Option<PathBuf>) -> Result<()> {
    let path = log_file.unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("powerdesk")
            .join("powerdesk.log")
    });
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Run the TUI until the user quits.
fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    app.handle_resize(terminal.size()?.width);

    // Run the main loop
    let result = run_app(&mut terminal, app);

    // Explicit teardown before the terminal is restored
    app.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        let now = Instant::now();

        // Drain sources, commit due writes, expire notices
        app.update(now);

        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            // The login gate replaces the dashboard entirely
            if let Some(screen) = &app.login {
                ui::login::render(frame, app, screen, area);
                ui::common::render_notices(frame, app, area);
                return;
            }

            let columns = if app.sidebar_open {
                Layout::horizontal([Constraint::Length(18), Constraint::Min(40)]).split(area)
            } else {
                Layout::horizontal([Constraint::Length(0), Constraint::Min(40)]).split(area)
            };

            if app.sidebar_open {
                ui::common::render_sidebar(frame, app, columns[0]);
            }

            let rows = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(columns[1]);

            ui::common::render_header(frame, app, rows[0]);

            match app.current_view {
                View::Overview => ui::overview::render(frame, app, rows[1], now),
                View::Chargers => ui::chargers::render(frame, app, rows[1], now),
                View::Battery => ui::battery::render(frame, app, rows[1], now),
            }

            ui::common::render_status_bar(frame, app, rows[2]);

            ui::common::render_notices(frame, app, area);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key, Instant::now()),
                Event::Resize(width, _) => app.handle_resize(width),
                _ => {}
            }
        }
    }

    Ok(())
}

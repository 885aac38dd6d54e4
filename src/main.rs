//! Land Registry
//!
//! A terminal land registry simulator. Properties are registered and
//! transferred through a tabbed UI; every change shows up at once as
//! pending and is confirmed after a simulated ledger delay.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use land_registry::application::{App, AppMode};
use land_registry::domain::RegistryStore;
use land_registry::error::AppError;
use land_registry::infrastructure::{init_logging, RegistryConfig};
use land_registry::presentation::{render_ui, InputHandler};

#[derive(Debug, Parser)]
#[command(name = "land-registry", version, about = "Terminal land registry simulator")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "LAND_REGISTRY_CONFIG")]
    config: Option<PathBuf>,

    /// Start with an empty registry instead of the demo parcels
    #[arg(long)]
    no_seed: bool,
}

/// Entry point for the land registry terminal application.
///
/// Loads configuration, sets up file logging and the terminal, then runs
/// the event loop until the user quits.
///
/// # Errors
///
/// Returns an error if the config is invalid, the log file cannot be
/// opened, or the terminal cannot be set up.
fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = RegistryConfig::load(cli.config.as_deref())?;
    init_logging(&config)?;
    info!(config = ?cli.config, tick_rate_ms = config.tick_rate_ms, "starting land registry");

    let mut store = RegistryStore::new(config.confirmation_delays());
    if config.seed_demo_data && !cli.no_seed {
        store.seed_demo_data();
    }
    let mut app = App::new(store, config.ui_timings());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, config.tick_rate());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "event loop failed");
        return Err(err.into());
    }

    info!(
        properties = app.store.properties().len(),
        transactions = app.store.transactions().len(),
        "land registry stopped"
    );
    Ok(())
}

/// Main application event loop.
///
/// Waits for key presses up to `tick_rate`, then advances the registry so
/// pending confirmations and toasts progress even when the user is idle.
/// Returns when the user presses 'q' in normal mode.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, tick_rate: Duration) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.mode == AppMode::Normal => return Ok(()),
                        _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }
}

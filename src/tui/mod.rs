//! Interactive terminal front end.
//!
//! Three screens share one [`App`]: the filterable note list, the note form
//! and the rendered note. Drawing uses ratatui; crossterm owns raw mode and
//! the alternate screen.

use std::io::{self, Stdout};
use std::panic;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::Database;
use crate::config::Config;
use crate::route::Route;
use crate::service::NoteService;

mod app;
pub mod event;
mod ui;

pub use app::{App, Focus, TagEditor};

type Screen = Terminal<CrosstermBackend<Stdout>>;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Switches stdout to raw mode on the alternate screen.
fn enter_screen() -> Result<Screen> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("failed to create terminal")
}

/// Puts the shell's screen back and shows the cursor again.
fn leave_screen(screen: &mut Screen) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(screen.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    screen.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Chains a hook that leaves raw mode before the default panic report, so
/// the message is readable.
fn install_panic_hook() {
    let report = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        report(info);
    }));
}

/// Draws `app` and feeds it key presses until it asks to quit.
///
/// The screen is restored whether the loop ends normally or with an error;
/// a storage failure while handling a key ends the loop with that error.
pub fn run_event_loop(app: &mut App) -> Result<()> {
    let mut screen = enter_screen()?;
    let outcome = drive(app, &mut screen);

    if let Err(e) = leave_screen(&mut screen) {
        eprintln!("Error restoring terminal: {e}");
    }
    outcome
}

fn drive(app: &mut App, screen: &mut Screen) -> Result<()> {
    loop {
        screen.draw(|frame| ui::draw(frame, app))?;

        if crossterm_event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = crossterm_event::read()?
            && key.kind == KeyEventKind::Press
            && event::handle_key_event(app, key)?
        {
            return Ok(());
        }
    }
}

/// Opens the storage file at `config.db_path` and runs the interactive app,
/// starting on `start`.
///
/// The data directory must already exist. A start route naming a missing
/// note lands on the list.
pub fn run(config: &Config, start: Route) -> Result<()> {
    install_panic_hook();

    let db = Database::open(&config.db_path).context("Failed to open database")?;
    let service = NoteService::new(Rc::new(db)).context("Failed to load notes from database")?;

    info!(
        path = %config.db_path.display(),
        notes = service.notes().len(),
        tags = service.tags().len(),
        route = %start,
        "starting TUI"
    );

    let mut app = App::new(service);
    app.navigate(start);
    run_event_loop(&mut app).context("TUI event loop failed")
}

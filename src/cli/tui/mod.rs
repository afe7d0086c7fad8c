//! Interactive board for the task roster
//!
//! Renders the current task list as a table and turns key presses into
//! the core events: grab, drop, create, edit, delete, refresh. All
//! network traffic goes through the background remote worker, so the
//! board stays responsive while requests are in flight.

mod app;
mod event;
mod view;

use std::io::{self, stdout, Stdout};
use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use super::Output;
use crate::remote::{worker, HttpTaskStore};
use app::App;
use event::{Event, EventHandler};

/// Terminal type alias
pub type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Launch the board
pub fn run(output: &Output, store: HttpTaskStore) -> Result<()> {
    output.verbose("Initializing board");

    let mut terminal = init_terminal()?;

    let events = EventHandler::new(250);
    let remote = {
        let tx = events.sender();
        worker::spawn(store, move |outcome| {
            let _ = tx.send(Event::Remote(outcome));
        })
    };

    let mut app = App::new(remote);

    // Run the main loop with panic safety so the terminal is restored
    // even if the app panics.
    let result = panic::catch_unwind(AssertUnwindSafe(|| app.run(&mut terminal, events)));

    let restore_result = restore_terminal();

    match result {
        Ok(inner_result) => {
            restore_result?;
            inner_result
        }
        Err(panic_payload) => {
            let _ = restore_result;
            if let Some(s) = panic_payload.downcast_ref::<&str>() {
                Err(anyhow!("Board panicked: {}", s))
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                Err(anyhow!("Board panicked: {}", s))
            } else {
                Err(anyhow!("Board panicked with unknown error"))
            }
        }
    }
}

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Terminal> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = ratatui::Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

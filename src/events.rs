//! Event handling functions for user input and animation clock updates.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::App;

/// Maximum time to wait for input before the animations are advanced again.
///
/// This is shorter than the fastest ghost step so that no step is noticeably late.
const POLL_TIMEOUT: Duration = Duration::from_millis(16);

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard events and dispatches them to [`handle_key`], then advances the
/// animation clock whether or not a key was pressed. It uses a short timeout to avoid blocking the
/// animation.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(POLL_TIMEOUT)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code, Instant::now());
            }
        }
    }

    app.update(Instant::now());

    Ok(())
}

/// Handles a single key press.
///
/// 'q' quits, 'r' replays the loading sequence on a new maze and 's' skips straight to the title.
/// Any other key is ignored.
pub(crate) fn handle_key(app: &mut App, code: KeyCode, now: Instant) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.exit = true,
        KeyCode::Char('r') => app.replay(now),
        KeyCode::Char('s') => app.skip(),
        _ => {}
    }
}

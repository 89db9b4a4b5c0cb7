//! Keyboard input handling.
//!
//! Navigation keys mutate [`App`] directly. Keys that need the provider are
//! returned as a [`Command`] for the main loop to carry out.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// Actions the main loop performs on the provider's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    RequestKey,
    CancelAll,
}

/// Process a single key event.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => return Some(Command::RequestKey),
        KeyCode::Char('c') => return Some(Command::CancelAll),
        KeyCode::Char('x') => app.clear(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        _ => {}
    }
    None
}

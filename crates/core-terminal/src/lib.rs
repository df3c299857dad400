//! Terminal driver: raw-mode lifecycle, window-size query, and decoding
//! of crossterm events into the editor's logical key events.
//!
//! Raw-mode failures are the one fatal error class in the editor; the
//! RAII guard restores the terminal on every exit path, panics included.

use anyhow::Result;
use crossterm::{
    cursor::{MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use std::io::stdout;
use std::time::Duration;

/// Poll interval for the blocking key read; keeps the process
/// interruptible and lets the caller refresh time-based UI state.
const READ_POLL: Duration = Duration::from_millis(100);

/// Logical key events consumed by the editing loop. Escape-sequence
/// decoding is entirely this crate's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Map a crossterm key event to a logical key. Returns `None` for events
/// we do not handle (releases, unsupported codes).
pub fn translate_key(event: &KeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let key = match event.code {
        KeyCode::Char(c) if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Key::Ctrl(c.to_ascii_lowercase())
        }
        // One byte is one display cell; non-ASCII input has no
        // representation in the row model and is dropped here.
        KeyCode::Char(c) if c.is_ascii() => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Tab => Key::Char('\t'),
        _ => return None,
    };
    Some(key)
}

/// Block until the next logical key event, polling so the loop can be
/// interrupted. Resize and other non-key events are swallowed here; the
/// caller re-queries the window size each frame.
pub fn read_key() -> Result<Key> {
    loop {
        if !event::poll(READ_POLL)? {
            continue;
        }
        if let Event::Key(key_event) = event::read()? {
            if let Some(key) = translate_key(&key_event) {
                return Ok(key);
            }
        }
    }
}

/// Terminal dimensions as `(rows, cols)`.
pub fn window_size() -> Result<(usize, usize)> {
    let (cols, rows) = terminal::size()?;
    Ok((rows as usize, cols as usize))
}

/// RAII guard: enables raw mode on construction and restores the original
/// terminal state (cooperative mode, visible cursor, cleared screen) on
/// drop, so an error return or panic never leaves the terminal raw.
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self { active: true })
    }

    pub fn leave(&mut self) -> Result<()> {
        if self.active {
            execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0), Show)?;
            disable_raw_mode()?;
            self.active = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

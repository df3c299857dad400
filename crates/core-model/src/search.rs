//! Incremental substring search over rendered rows.
//!
//! One row at a time carries a temporary `Match` highlight override; the
//! session keeps a saved copy of that row's real highlight so colors can be
//! restored before the next step or when the search interaction ends. The
//! session lives only for one search interaction (prompt open to close).

use crate::Document;
use core_text::{rx_to_cx, Highlight};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// How the caller's keystroke steers the next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMove {
    /// Arrow down/right: continue forward from the last match.
    Next,
    /// Arrow up/left: continue backward from the last match.
    Prev,
    /// Query edited or any other key: forget the last match and restart
    /// forward from the top.
    Reset,
}

#[derive(Default)]
pub struct SearchSession {
    last_match: Option<usize>,
    saved: Option<(usize, Vec<Highlight>)>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the overridden row's highlight, if any. Called before every
    /// step and when the interaction ends (confirm or cancel).
    pub fn restore(&mut self, doc: &mut Document) {
        if let Some((line, hl)) = self.saved.take() {
            if let Some(row) = doc.row_mut(line) {
                row.set_highlight(hl);
            }
        }
    }

    /// End the interaction: restore colors and forget the match anchor so
    /// a later session starts fresh from the top.
    pub fn finish(&mut self, doc: &mut Document) {
        self.restore(doc);
        self.last_match = None;
    }

    /// Step the search. Restores the previous override, then walks rows in
    /// the requested direction with wraparound, visiting each row at most
    /// once. On a match the cursor moves to the match start (render offset
    /// converted back to a logical column) and the matched span is painted
    /// `Match`. Returns the matched row index; `None` leaves the cursor
    /// untouched.
    pub fn step(&mut self, doc: &mut Document, query: &str, mv: SearchMove) -> Option<usize> {
        self.restore(doc);
        if query.is_empty() || doc.row_count() == 0 {
            self.last_match = None;
            return None;
        }

        let direction = match mv {
            SearchMove::Next => Direction::Forward,
            SearchMove::Prev => Direction::Backward,
            SearchMove::Reset => {
                self.last_match = None;
                Direction::Forward
            }
        };
        // With no anchor yet, only forward stepping makes the first probe
        // land on row 0.
        let direction = if self.last_match.is_none() {
            Direction::Forward
        } else {
            direction
        };

        let count = doc.row_count();
        let mut current = self.last_match.unwrap_or(count - 1);
        for _ in 0..count {
            current = match direction {
                Direction::Forward => (current + 1) % count,
                Direction::Backward => (current + count - 1) % count,
            };
            let Some(row) = doc.row(current) else {
                continue;
            };
            let Some(offset) = row.render().find(query) else {
                continue;
            };
            let cx = rx_to_cx(row.chars(), offset);
            let saved_hl = row.highlight().to_vec();
            self.last_match = Some(current);
            self.saved = Some((current, saved_hl));
            doc.cy = current;
            doc.cx = cx;
            if let Some(row) = doc.row_mut(current) {
                row.paint_highlight(offset, query.len(), Highlight::Match);
            }
            debug!(row = current, offset, query, "search match");
            return Some(current);
        }
        None
    }
}

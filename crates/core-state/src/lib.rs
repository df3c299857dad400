//! Editor state aggregate: document, viewport, transient status message,
//! and the unsaved-changes quit guard.
//!
//! One `EditorState` is threaded by exclusive reference through the single
//! synchronous loop; nothing here is shared, so no locking exists anywhere
//! in the editor. The only time-dependent piece is the status message,
//! whose expiry is checked opportunistically at render time rather than by
//! a timer.

use std::time::{Duration, Instant};

use core_model::Document;
use core_text::cx_to_rx;
use tracing::debug;

/// How long a status message stays visible.
pub const MESSAGE_TTL: Duration = Duration::from_secs(5);

/// Quit confirmations required while the buffer is dirty.
pub const QUIT_CONFIRMS: u8 = 3;

/// Visible window into the document. Offsets move the minimum amount
/// needed to keep the cursor inside the window; there is no re-centering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Viewport {
    /// First visible row index.
    pub row_offset: usize,
    /// First visible rendered column.
    pub col_offset: usize,
    /// Text rows available (status and message bars already excluded).
    pub screen_rows: usize,
    pub screen_cols: usize,
    /// Cursor's visual column, recomputed by `scroll`.
    pub rx: usize,
}

impl Viewport {
    pub fn new(screen_rows: usize, screen_cols: usize) -> Self {
        Self {
            screen_rows,
            screen_cols,
            ..Self::default()
        }
    }

    /// Recompute the cursor's visual column and clamp both offsets so the
    /// cursor is inside `[offset, offset + extent)`. Runs once per frame
    /// before composition.
    pub fn scroll(&mut self, doc: &Document) {
        self.rx = match doc.row(doc.cy) {
            Some(row) => cx_to_rx(row.chars(), doc.cx),
            None => 0,
        };
        if doc.cy < self.row_offset {
            self.row_offset = doc.cy;
        }
        if self.screen_rows > 0 && doc.cy >= self.row_offset + self.screen_rows {
            self.row_offset = doc.cy - self.screen_rows + 1;
        }
        if self.rx < self.col_offset {
            self.col_offset = self.rx;
        }
        if self.screen_cols > 0 && self.rx >= self.col_offset + self.screen_cols {
            self.col_offset = self.rx - self.screen_cols + 1;
        }
    }

    /// Push the vertical offset past the end of the document so the next
    /// `scroll` pass snaps the cursor row to the top of the window. Used
    /// after a search jump.
    pub fn force_reclamp(&mut self, row_count: usize) {
        self.row_offset = row_count;
    }
}

#[derive(Debug)]
struct StatusMessage {
    text: String,
    stamp: Instant,
}

/// Everything the main loop mutates between frames.
pub struct EditorState {
    pub doc: Document,
    pub viewport: Viewport,
    message: Option<StatusMessage>,
    quit_confirms_left: u8,
}

impl EditorState {
    pub fn new(doc: Document, viewport: Viewport) -> Self {
        Self {
            doc,
            viewport,
            message: None,
            quit_confirms_left: QUIT_CONFIRMS,
        }
    }

    /// Replace the transient status message; it decays after
    /// [`MESSAGE_TTL`].
    pub fn set_status_message(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            stamp: Instant::now(),
        });
    }

    pub fn clear_status_message(&mut self) {
        self.message = None;
    }

    /// The current message, or `None` once it has expired.
    pub fn status_message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .filter(|m| m.stamp.elapsed() < MESSAGE_TTL)
            .map(|m| m.text.as_str())
    }

    /// One quit request. Returns `true` when quitting may proceed: either
    /// the buffer is clean or the guard counter is exhausted. While the
    /// guard holds, the remaining count is surfaced as a warning message.
    pub fn request_quit(&mut self) -> bool {
        if !self.doc.is_dirty() {
            return true;
        }
        if self.quit_confirms_left == 0 {
            return true;
        }
        debug!(remaining = self.quit_confirms_left, "quit guard engaged");
        self.set_status_message(format!(
            "WARNING! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
            self.quit_confirms_left
        ));
        self.quit_confirms_left -= 1;
        false
    }

    /// Any key other than a quit request re-arms the guard.
    pub fn reset_quit_guard(&mut self) {
        self.quit_confirms_left = QUIT_CONFIRMS;
    }
}

//! Line storage: a `Row` owns one logical line together with its cached
//! rendered form and per-cell highlight classes.
//!
//! The model is deliberately byte-oriented: one byte is one display cell,
//! except tabs which expand to the next multiple of [`TAB_STOP`]. The
//! rendered form is always a pure function of `chars` plus the tab stop and
//! is recomputed on every mutation; it is never persisted.
//!
//! Invariants upheld by every public mutator:
//! * `highlight.len() == render.len()` (callers repaint after mutation, but
//!   a fresh row starts with a correctly sized all-`Normal` vector).
//! * `chars` never contains a raw newline.

pub mod tabs;

pub use tabs::{cx_to_rx, rx_to_cx, TAB_STOP};

/// Per-cell syntax classification, parallel to a row's rendered bytes.
///
/// `Match` is a transient override used by the search engine; it never
/// survives past the search interaction that painted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Normal,
    Comment,
    BlockComment,
    Keyword1,
    Keyword2,
    String,
    Number,
    Match,
}

/// One logical line of the document with its derived render/highlight caches.
#[derive(Debug, Clone, Default)]
pub struct Row {
    chars: String,
    render: String,
    highlight: Vec<Highlight>,
    /// True when this row's text ends inside an unterminated block comment.
    /// Consumed as the input state for the following row's highlight pass.
    pub ends_open_comment: bool,
}

impl Row {
    /// Build a row from logical content, computing the render cache eagerly.
    pub fn new(chars: impl Into<String>) -> Self {
        let mut row = Self {
            chars: chars.into(),
            render: String::new(),
            highlight: Vec::new(),
            ends_open_comment: false,
        };
        debug_assert!(!row.chars.contains('\n'), "row content must be newline-free");
        row.update_render();
        row
    }

    /// Logical content, no trailing newline.
    pub fn chars(&self) -> &str {
        &self.chars
    }

    /// Tab-expanded visual form, one byte per cell.
    pub fn render(&self) -> &str {
        &self.render
    }

    pub fn highlight(&self) -> &[Highlight] {
        &self.highlight
    }

    /// Replace the highlight vector. Length must match the render cache.
    pub fn set_highlight(&mut self, hl: Vec<Highlight>) {
        debug_assert_eq!(hl.len(), self.render.len());
        self.highlight = hl;
    }

    /// Overwrite a span of highlight cells, clamped to the render width.
    /// Used by the search engine to paint a match marker.
    pub fn paint_highlight(&mut self, start: usize, len: usize, class: Highlight) {
        let end = (start + len).min(self.highlight.len());
        for cell in &mut self.highlight[start.min(end)..end] {
            *cell = class;
        }
    }

    /// Byte length of the logical content.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Insert one byte at logical column `at` (clamped to the row length).
    pub fn insert_char(&mut self, at: usize, c: char) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, c);
        self.update_render();
    }

    /// Remove the byte at logical column `at`. No-op when out of bounds.
    pub fn delete_char(&mut self, at: usize) {
        if at >= self.chars.len() {
            return;
        }
        self.chars.remove(at);
        self.update_render();
    }

    /// Append raw text; the join path of backspace-at-column-0.
    pub fn append_str(&mut self, s: &str) {
        self.chars.push_str(s);
        self.update_render();
    }

    /// Truncate to `[0, at)` and return the tail `[at, len)` for the caller
    /// to place on a new row.
    pub fn split_off(&mut self, at: usize) -> String {
        let at = at.min(self.chars.len());
        let tail = self.chars.split_off(at);
        self.update_render();
        tail
    }

    /// Recompute the render cache: tabs expand to the next multiple of
    /// [`TAB_STOP`] (at least one cell), every other byte is one cell. The
    /// highlight vector is resized to match and reset to `Normal`; the
    /// owning document repaints it afterwards.
    fn update_render(&mut self) {
        self.render.clear();
        for c in self.chars.chars() {
            if c == '\t' {
                self.render.push(' ');
                while self.render.len() % TAB_STOP != 0 {
                    self.render.push(' ');
                }
            } else {
                self.render.push(c);
            }
        }
        self.highlight.clear();
        self.highlight.resize(self.render.len(), Highlight::Normal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_expands_tabs_to_stop() {
        let row = Row::new("\tx");
        assert_eq!(row.render(), "        x");
        assert_eq!(row.highlight().len(), row.render().len());
    }

    #[test]
    fn render_tab_mid_row_fills_to_next_stop() {
        let row = Row::new("ab\tc");
        // "ab" occupies cells 0..2; the tab fills 2..8.
        assert_eq!(row.render(), "ab      c");
    }

    /// Reference replay of the expansion rule: a tab advances to the next
    /// multiple of [`TAB_STOP`], everything else is one cell.
    fn rendered_width(chars: &str) -> usize {
        let mut w = 0;
        for c in chars.chars() {
            if c == '\t' {
                w = w / TAB_STOP * TAB_STOP + TAB_STOP;
            } else {
                w += 1;
            }
        }
        w
    }

    #[test]
    fn render_width_matches_expansion_rule() {
        // a tab at a misaligned column fills fewer than TAB_STOP cells,
        // so the width is not a simple per-tab constant
        for chars in ["a\tb\tc", "xa\tb", "\t\t", "ab\tcd\t", "plain"] {
            let mut row = Row::new(chars);
            assert_eq!(row.render().len(), rendered_width(row.chars()), "{chars:?}");
            row.insert_char(0, 'x');
            assert_eq!(row.render().len(), rendered_width(row.chars()), "{chars:?} shifted");
        }
    }

    #[test]
    fn stop_aligned_tabs_expand_to_full_stops() {
        // with every tab starting on a stop boundary each one is worth
        // exactly TAB_STOP cells
        let row = Row::new("\t\tab");
        assert_eq!(row.render().len(), 2 * TAB_STOP + 2);
    }

    #[test]
    fn insert_and_delete_round_trip() {
        let mut row = Row::new("hello");
        row.insert_char(5, '!');
        assert_eq!(row.chars(), "hello!");
        row.delete_char(5);
        assert_eq!(row.chars(), "hello");
        // out of bounds delete is a no-op
        row.delete_char(99);
        assert_eq!(row.chars(), "hello");
    }

    #[test]
    fn split_off_moves_tail() {
        let mut row = Row::new("abcdef");
        let tail = row.split_off(3);
        assert_eq!(row.chars(), "abc");
        assert_eq!(tail, "def");
    }

    #[test]
    fn paint_highlight_clamps_to_width() {
        let mut row = Row::new("abc");
        row.paint_highlight(1, 10, Highlight::Match);
        assert_eq!(
            row.highlight(),
            &[Highlight::Normal, Highlight::Match, Highlight::Match]
        );
    }
}

//! Document model: the ordered row collection, cursor, dirty counter, and
//! every point-edit operation, plus the highlight cascade that keeps
//! multi-line comment state consistent under arbitrary edits.
//!
//! Row indices are positional, never stored: the cascade is an iterative
//! work loop that feeds each row the previous row's end-of-row comment
//! flag and keeps walking only while that flag changes. This bounds a
//! repaint to the contiguous span an edit actually affected.
//!
//! Cursor invariants (held after every public mutation):
//! * `cy` is in `[0, row_count]`; `cy == row_count` is the virtual empty
//!   row past the end.
//! * `cx` is in `[0, row(cy).len()]` whenever `cy` addresses a real row.

use std::path::{Path, PathBuf};

use core_syntax::{highlight_row, Syntax};
use core_text::Row;
use tracing::{debug, info};

pub mod search;
pub mod storage;

pub use search::{SearchMove, SearchSession};
pub use storage::StorageError;

/// The in-memory file: ordered rows plus cursor and bookkeeping.
#[derive(Default)]
pub struct Document {
    rows: Vec<Row>,
    /// Cursor logical column within the current row.
    pub cx: usize,
    /// Cursor row index; may equal `row_count()` (virtual end row).
    pub cy: usize,
    dirty: u64,
    filename: Option<PathBuf>,
    syntax: Option<&'static Syntax>,
}

impl Document {
    /// An empty, unnamed, renderable buffer (zero rows is a valid state).
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` from disk, selecting a syntax profile from its name.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let lines = storage::read_lines(path)?;
        let mut doc = Self {
            filename: Some(path.to_path_buf()),
            syntax: path.to_str().and_then(core_syntax::select),
            ..Self::default()
        };
        for line in lines {
            doc.rows.push(Row::new(line));
        }
        doc.rehighlight_all();
        doc.dirty = 0;
        info!(
            path = %path.display(),
            rows = doc.rows.len(),
            filetype = doc.filetype(),
            "opened file"
        );
        Ok(doc)
    }

    /// Write the serialized buffer to the current filename, clearing the
    /// dirty counter on success. Returns bytes written.
    pub fn save(&mut self) -> Result<usize, StorageError> {
        let path = self
            .filename
            .clone()
            .ok_or(StorageError::NoFilename)?;
        let bytes = self.serialize();
        let written = storage::write_all(&path, bytes.as_bytes())?;
        self.dirty = 0;
        info!(path = %path.display(), bytes = written, "saved file");
        Ok(written)
    }

    /// Adopt a filename (save-as path) and re-select the syntax profile.
    pub fn set_filename(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.syntax = path.to_str().and_then(core_syntax::select);
        self.filename = Some(path);
        self.rehighlight_all();
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Syntax profile display name, if one was recognized.
    pub fn filetype(&self) -> Option<&'static str> {
        self.syntax.map(|s| s.name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn row_mut(&mut self, at: usize) -> Option<&mut Row> {
        self.rows.get_mut(at)
    }

    /// Unsaved-mutation count; 0 means clean.
    pub fn dirty(&self) -> u64 {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// One newline per row, including the last; byte-for-byte the on-disk
    /// representation.
    pub fn serialize(&self) -> String {
        let cap = self.rows.iter().map(|r| r.len() + 1).sum();
        let mut out = String::with_capacity(cap);
        for row in &self.rows {
            out.push_str(row.chars());
            out.push('\n');
        }
        out
    }

    /// Insert a new row at `at`, shifting subsequent rows. Out-of-range
    /// positions are ignored.
    pub fn insert_row(&mut self, at: usize, text: impl Into<String>) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::new(text));
        self.dirty += 1;
        self.rehighlight_from(at);
    }

    /// Remove the row at `at`; silently ignores out-of-bounds indices.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.dirty += 1;
        // The row now occupying `at` may need a different carry-in state.
        self.rehighlight_from(at);
    }

    /// Insert one character at the cursor, materializing the virtual end
    /// row first when needed. `cx` is a byte index, so it advances by the
    /// character's encoded length and always lands on a char boundary.
    pub fn insert_char(&mut self, c: char) {
        if self.cy == self.rows.len() {
            self.rows.push(Row::new(""));
        }
        self.rows[self.cy].insert_char(self.cx, c);
        self.cx += c.len_utf8();
        self.dirty += 1;
        self.rehighlight_from(self.cy);
    }

    /// Split the cursor row at the cursor column; the cursor moves to
    /// column 0 of the new row.
    pub fn insert_newline(&mut self) {
        if self.cx == 0 {
            self.insert_row(self.cy, "");
        } else {
            let tail = self.rows[self.cy].split_off(self.cx);
            self.rows.insert(self.cy + 1, Row::new(tail));
            self.dirty += 1;
            self.rehighlight_from(self.cy);
        }
        self.cy += 1;
        self.cx = 0;
    }

    /// Backspace semantics: delete the byte left of the cursor, or join
    /// the cursor row onto the previous row when the cursor sits at
    /// column 0 (placing the cursor at the join seam).
    pub fn delete_char(&mut self) {
        if self.cy == self.rows.len() {
            return;
        }
        if self.cx == 0 && self.cy == 0 {
            return;
        }
        if self.cx > 0 {
            self.rows[self.cy].delete_char(self.cx - 1);
            self.cx -= 1;
            self.dirty += 1;
            self.rehighlight_from(self.cy);
        } else {
            let merged = self.rows[self.cy].chars().to_string();
            self.cx = self.rows[self.cy - 1].len();
            self.rows[self.cy - 1].append_str(&merged);
            self.cy -= 1;
            self.dirty += 1;
            // delete_row repaints from the removed slot; the merged row
            // above it still needs its own repaint (and may cascade).
            self.delete_row(self.cy + 1);
            self.rehighlight_from(self.cy);
        }
    }

    /// Repaint row `at`, then keep walking down only while a row's
    /// end-of-row block-comment flag changes. Each row is visited at most
    /// once per call.
    pub fn rehighlight_from(&mut self, at: usize) {
        let mut idx = at;
        while idx < self.rows.len() {
            let carry_in = idx > 0 && self.rows[idx - 1].ends_open_comment;
            let (hl, ends_open) = highlight_row(self.rows[idx].render(), self.syntax, carry_in);
            let changed = self.rows[idx].ends_open_comment != ends_open;
            self.rows[idx].ends_open_comment = ends_open;
            self.rows[idx].set_highlight(hl);
            if !changed {
                break;
            }
            idx += 1;
        }
        if idx > at + 1 {
            debug!(from = at, rows = idx - at, "highlight cascade");
        }
    }

    /// Unconditional full-file repaint, used when the syntax profile itself
    /// changes (open, save-as). Point edits go through `rehighlight_from`.
    fn rehighlight_all(&mut self) {
        let mut carry = false;
        for row in &mut self.rows {
            let (hl, ends_open) = highlight_row(row.render(), self.syntax, carry);
            row.ends_open_comment = ends_open;
            row.set_highlight(hl);
            carry = ends_open;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Highlight as H;

    fn doc_from(lines: &[&str]) -> Document {
        let mut doc = Document::new();
        for (i, line) in lines.iter().enumerate() {
            doc.insert_row(i, *line);
        }
        doc
    }

    fn doc_with_c_syntax(lines: &[&str]) -> Document {
        let mut doc = doc_from(lines);
        doc.set_filename("scratch.c");
        doc
    }

    #[test]
    fn serialize_appends_one_newline_per_row() {
        let doc = doc_from(&["abc", "", "def"]);
        assert_eq!(doc.serialize(), "abc\n\ndef\n");
    }

    #[test]
    fn empty_document_serializes_to_nothing() {
        assert_eq!(Document::new().serialize(), "");
    }

    #[test]
    fn insert_row_shifts_followers() {
        let mut doc = doc_from(&["a", "b"]);
        doc.insert_row(1, "mid");
        assert_eq!(doc.row_count(), 3);
        assert_eq!(doc.row(1).unwrap().chars(), "mid");
        // the original row 1 now sits at position 2
        assert_eq!(doc.row(2).unwrap().chars(), "b");
    }

    #[test]
    fn insert_row_past_end_is_ignored() {
        let mut doc = doc_from(&["a"]);
        doc.insert_row(5, "x");
        assert_eq!(doc.row_count(), 1);
    }

    #[test]
    fn delete_row_out_of_bounds_is_noop() {
        let mut doc = doc_from(&["a"]);
        let dirty = doc.dirty();
        doc.delete_row(7);
        assert_eq!(doc.row_count(), 1);
        assert_eq!(doc.dirty(), dirty);
    }

    #[test]
    fn insert_char_on_virtual_end_row_materializes_it() {
        let mut doc = Document::new();
        doc.insert_char('x');
        assert_eq!(doc.row_count(), 1);
        assert_eq!(doc.row(0).unwrap().chars(), "x");
        assert_eq!(doc.cx, 1);
    }

    #[test]
    fn multibyte_insert_keeps_cursor_on_char_boundary() {
        let mut doc = Document::new();
        doc.insert_char('é');
        doc.insert_char('x');
        assert_eq!(doc.row(0).unwrap().chars(), "éx");
        assert_eq!(doc.cx, 3);
    }

    #[test]
    fn backspace_at_column_zero_joins_rows() {
        let mut doc = doc_from(&["abc", "def"]);
        doc.cy = 1;
        doc.cx = 0;
        doc.delete_char();
        assert_eq!(doc.row_count(), 1);
        assert_eq!(doc.row(0).unwrap().chars(), "abcdef");
        assert_eq!((doc.cy, doc.cx), (0, 3));
    }

    #[test]
    fn backspace_at_document_start_is_ignored() {
        let mut doc = doc_from(&["abc"]);
        doc.delete_char();
        assert_eq!(doc.row(0).unwrap().chars(), "abc");
    }

    #[test]
    fn newline_splits_row_at_cursor() {
        let mut doc = doc_from(&["abcd"]);
        doc.cx = 2;
        doc.insert_newline();
        assert_eq!(doc.row(0).unwrap().chars(), "ab");
        assert_eq!(doc.row(1).unwrap().chars(), "cd");
        assert_eq!((doc.cy, doc.cx), (1, 0));
    }

    #[test]
    fn newline_at_column_zero_inserts_empty_row_above() {
        let mut doc = doc_from(&["abcd"]);
        doc.insert_newline();
        assert_eq!(doc.row(0).unwrap().chars(), "");
        assert_eq!(doc.row(1).unwrap().chars(), "abcd");
    }

    #[test]
    fn mutations_increment_dirty_and_save_paths_reset_it() {
        let mut doc = doc_from(&["a"]);
        let before = doc.dirty();
        doc.insert_char('b');
        doc.delete_char();
        assert!(doc.dirty() > before);
    }

    #[test]
    fn opening_comment_cascades_down() {
        let mut doc = doc_with_c_syntax(&["a", "b", "*/c"]);
        doc.cy = 0;
        doc.cx = 0;
        doc.insert_char('/');
        doc.insert_char('*');
        // rows 0 and 1 fully block comment
        assert!(doc.row(0).unwrap().highlight().iter().all(|&h| h == H::BlockComment));
        assert!(doc.row(1).unwrap().highlight().iter().all(|&h| h == H::BlockComment));
        // row 2: "*/" closes, "c" back to normal
        let hl2 = doc.row(2).unwrap().highlight();
        assert_eq!(&hl2[0..2], &[H::BlockComment; 2]);
        assert_eq!(hl2[2], H::Normal);
    }

    #[test]
    fn removing_comment_opener_cascades_back_to_normal() {
        let mut doc = doc_with_c_syntax(&["/*a", "b", "c*/", "d"]);
        assert!(doc.row(1).unwrap().highlight().iter().all(|&h| h == H::BlockComment));
        doc.cy = 0;
        doc.cx = 2;
        doc.delete_char();
        doc.delete_char();
        assert!(doc.row(1).unwrap().highlight().iter().all(|&h| h == H::Normal));
        assert!(doc.row(3).unwrap().highlight().iter().all(|&h| h == H::Normal));
    }

    #[test]
    fn cascade_stops_where_state_stabilizes() {
        // The closing delimiter on row 1 makes row 2 independent of the
        // edit on row 0, so its highlight is untouched by the cascade.
        let mut doc = doc_with_c_syntax(&["a", "x */ y", "int z;"]);
        doc.cy = 0;
        doc.cx = 0;
        doc.insert_char('/');
        doc.insert_char('*');
        let hl2 = doc.row(2).unwrap().highlight();
        assert_eq!(&hl2[0..3], &[H::Keyword2; 3]);
    }
}

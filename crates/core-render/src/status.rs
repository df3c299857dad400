//! Status and message bar text composition.
//!
//! Kept as pure string builders so tests can assert exact output; the
//! frame composer applies the inverted style and padding around them.

use core_state::EditorState;

/// Dirty-counter magnitude past which the marker escalates.
pub const HEAVY_DIRTY_THRESHOLD: u64 = 32;

/// Everything the status line needs, extracted from editor state.
pub struct StatusContext<'a> {
    pub filename: Option<&'a str>,
    pub filetype: Option<&'a str>,
    pub dirty: u64,
    /// 0-based cursor row.
    pub row: usize,
    pub row_count: usize,
}

impl<'a> StatusContext<'a> {
    pub fn from_state(state: &'a EditorState) -> Self {
        Self {
            filename: state.doc.filename().and_then(|p| p.to_str()),
            filetype: state.doc.filetype(),
            dirty: state.doc.dirty(),
            row: state.doc.cy,
            row_count: state.doc.row_count(),
        }
    }
}

fn dirty_marker(dirty: u64) -> &'static str {
    match dirty {
        0 => "",
        1..=HEAVY_DIRTY_THRESHOLD => "(modified)",
        _ => "(modified++)",
    }
}

/// Left-aligned half: filename (truncated to 20 bytes), row count, dirty
/// marker.
pub fn left_status(ctx: &StatusContext) -> String {
    let name = ctx.filename.unwrap_or("[No Name]");
    let name = name.get(..20).unwrap_or(name);
    format!("{} - {} lines {}", name, ctx.row_count, dirty_marker(ctx.dirty))
}

/// Right-aligned half: filetype and `current/total`.
pub fn right_status(ctx: &StatusContext) -> String {
    format!(
        "{} | {}/{}",
        ctx.filetype.unwrap_or("no ft"),
        ctx.row + 1,
        ctx.row_count
    )
}

/// Fit both halves into `width` cells: left truncated to the width, right
/// right-justified in the remaining space, spaces between.
pub fn fit_status(left: &str, right: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    out.push_str(left.get(..width).unwrap_or(left));
    while out.len() < width {
        if width - out.len() == right.len() {
            out.push_str(right);
            break;
        }
        out.push(' ');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> StatusContext<'static> {
        StatusContext {
            filename: Some("main.c"),
            filetype: Some("c"),
            dirty: 0,
            row: 4,
            row_count: 10,
        }
    }

    #[test]
    fn left_half_clean_buffer() {
        assert_eq!(left_status(&ctx()), "main.c - 10 lines ");
    }

    #[test]
    fn left_half_dirty_marker_escalates() {
        let mut c = ctx();
        c.dirty = 1;
        assert_eq!(left_status(&c), "main.c - 10 lines (modified)");
        c.dirty = HEAVY_DIRTY_THRESHOLD + 1;
        assert_eq!(left_status(&c), "main.c - 10 lines (modified++)");
    }

    #[test]
    fn unnamed_buffer_placeholder() {
        let mut c = ctx();
        c.filename = None;
        assert!(left_status(&c).starts_with("[No Name]"));
    }

    #[test]
    fn long_filename_truncated_to_twenty() {
        let mut c = ctx();
        c.filename = Some("an_extremely_long_filename.c");
        assert!(left_status(&c).starts_with("an_extremely_long_fi "));
    }

    #[test]
    fn right_half_shows_filetype_and_position() {
        assert_eq!(right_status(&ctx()), "c | 5/10");
        let mut c = ctx();
        c.filetype = None;
        assert_eq!(right_status(&c), "no ft | 5/10");
    }

    #[test]
    fn fit_right_justifies_within_width() {
        let s = fit_status("left", "right", 20);
        assert_eq!(s.len(), 20);
        assert!(s.starts_with("left"));
        assert!(s.ends_with("right"));
        assert_eq!(&s[4..15], "           ");
    }

    #[test]
    fn fit_drops_right_half_when_it_cannot_fit() {
        let s = fit_status("a-very-long-left-side", "right", 22);
        assert_eq!(s.len(), 22);
        assert!(!s.contains("right"));
    }

    #[test]
    fn fit_truncates_overlong_left() {
        let s = fit_status("abcdefghij", "r", 4);
        assert_eq!(s, "abcd");
    }
}

//! Screen composition: builds one complete frame (text rows, status bar,
//! message bar, cursor placement) from document + viewport state.
//!
//! The frame is a full repaint, not a diff: every visible row is emitted
//! each time, batched into a single write through [`frame::FrameBuffer`].
//! Color control sequences are minimized by emitting one color switch per
//! highlight run instead of per cell.
//!
//! Composition order is fixed: hide cursor, home, rows, status bar,
//! message bar, cursor reposition, show cursor. The cursor is therefore
//! never visible at a stale position mid-repaint.

use anyhow::Result;
use core_state::EditorState;
use core_text::Highlight;
use crossterm::style::Color;
use std::ops::Range;

pub mod frame;
pub mod status;

pub use frame::FrameBuffer;
pub use status::{fit_status, left_status, right_status, StatusContext};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Foreground color per highlight class; `None` is the terminal default.
fn color_for(h: Highlight) -> Option<Color> {
    match h {
        Highlight::Normal => None,
        Highlight::Comment | Highlight::BlockComment => Some(Color::DarkCyan),
        Highlight::Keyword1 => Some(Color::DarkYellow),
        Highlight::Keyword2 => Some(Color::DarkGreen),
        Highlight::String => Some(Color::DarkMagenta),
        Highlight::Number => Some(Color::DarkRed),
        Highlight::Match => Some(Color::DarkBlue),
    }
}

/// Group a highlight slice into maximal same-class runs. One color switch
/// is emitted per run.
fn highlight_runs(hl: &[Highlight]) -> Vec<(Highlight, Range<usize>)> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=hl.len() {
        if i == hl.len() || hl[i] != hl[start] {
            runs.push((hl[start], start..i));
            start = i;
        }
    }
    runs
}

/// Compose one full frame. The caller presents it with a single write.
pub fn compose_frame(state: &EditorState) -> Result<FrameBuffer> {
    let mut frame = FrameBuffer::new();
    frame.hide_cursor()?;
    frame.move_to(0, 0)?;
    draw_rows(state, &mut frame)?;
    draw_status_bar(state, &mut frame)?;
    draw_message_bar(state, &mut frame)?;

    let vp = &state.viewport;
    let cursor_col = vp.rx.saturating_sub(vp.col_offset);
    let cursor_row = state.doc.cy.saturating_sub(vp.row_offset);
    frame.move_to(cursor_col as u16, cursor_row as u16)?;
    frame.show_cursor()?;
    Ok(frame)
}

fn draw_rows(state: &EditorState, frame: &mut FrameBuffer) -> Result<()> {
    let vp = &state.viewport;
    let doc = &state.doc;
    for y in 0..vp.screen_rows {
        let file_row = y + vp.row_offset;
        match doc.row(file_row) {
            None => {
                if doc.row_count() == 0 && y == vp.screen_rows / 3 {
                    draw_welcome(vp.screen_cols, frame)?;
                } else {
                    frame.print("~")?;
                }
            }
            Some(row) => {
                let render = row.render().as_bytes();
                let hl = row.highlight();
                let start = vp.col_offset.min(render.len());
                let end = (vp.col_offset + vp.screen_cols).min(render.len());
                draw_row_slice(&render[start..end], &hl[start..end], frame)?;
            }
        }
        frame.clear_to_line_end()?;
        frame.print("\r\n")?;
    }
    Ok(())
}

/// Emit one visible row slice, one color switch per highlight run.
/// Non-printable bytes become a visible placeholder in inverted style;
/// the run's color is restored afterwards because the attribute reset
/// also clears the foreground.
fn draw_row_slice(render: &[u8], hl: &[Highlight], frame: &mut FrameBuffer) -> Result<()> {
    for (class, range) in highlight_runs(hl) {
        let color = color_for(class);
        match color {
            Some(c) => frame.set_foreground(c)?,
            None => frame.reset_color()?,
        }
        for &byte in &render[range] {
            if byte.is_ascii_control() {
                let sym = if byte <= 26 { (b'@' + byte) as char } else { '?' };
                frame.set_reverse(true)?;
                frame.print_char(sym)?;
                frame.set_reverse(false)?;
                if let Some(c) = color {
                    frame.set_foreground(c)?;
                }
            } else {
                frame.print_char(byte as char)?;
            }
        }
    }
    frame.reset_color()?;
    Ok(())
}

fn draw_welcome(width: usize, frame: &mut FrameBuffer) -> Result<()> {
    let mut welcome = format!("leaf editor -- version {VERSION}");
    welcome.truncate(width);
    let padding = (width.saturating_sub(welcome.len())) / 2;
    if padding > 0 {
        frame.print("~")?;
        for _ in 1..padding {
            frame.print(" ")?;
        }
    }
    frame.print(&welcome)?;
    Ok(())
}

fn draw_status_bar(state: &EditorState, frame: &mut FrameBuffer) -> Result<()> {
    let ctx = StatusContext::from_state(state);
    let line = fit_status(
        &left_status(&ctx),
        &right_status(&ctx),
        state.viewport.screen_cols,
    );
    frame.set_reverse(true)?;
    frame.print(&line)?;
    frame.set_reverse(false)?;
    frame.print("\r\n")?;
    Ok(())
}

fn draw_message_bar(state: &EditorState, frame: &mut FrameBuffer) -> Result<()> {
    frame.clear_to_line_end()?;
    if let Some(msg) = state.status_message() {
        let width = state.viewport.screen_cols;
        if msg.len() > width {
            let clipped: String = msg.chars().take(width).collect();
            frame.print(&clipped)?;
        } else {
            frame.print(msg)?;
        }
    }
    Ok(())
}

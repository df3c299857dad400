//! Append buffer: terminal commands queued into one in-memory byte buffer
//! handed to the terminal in a single write per frame. Nothing reaches the
//! screen until `present` runs, so a partially composed frame is never
//! visible.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::Write;

#[derive(Default)]
pub struct FrameBuffer {
    buf: Vec<u8>,
    /// Foreground color switches queued this frame; the composer keeps
    /// this at one per highlight run.
    pub color_switches: u64,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hide_cursor(&mut self) -> Result<()> {
        queue!(self.buf, Hide)?;
        Ok(())
    }

    pub fn show_cursor(&mut self) -> Result<()> {
        queue!(self.buf, Show)?;
        Ok(())
    }

    pub fn move_to(&mut self, col: u16, row: u16) -> Result<()> {
        queue!(self.buf, MoveTo(col, row))?;
        Ok(())
    }

    pub fn print(&mut self, s: &str) -> Result<()> {
        queue!(self.buf, Print(s))?;
        Ok(())
    }

    pub fn print_char(&mut self, c: char) -> Result<()> {
        queue!(self.buf, Print(c))?;
        Ok(())
    }

    pub fn set_foreground(&mut self, color: Color) -> Result<()> {
        queue!(self.buf, SetForegroundColor(color))?;
        self.color_switches += 1;
        Ok(())
    }

    pub fn reset_color(&mut self) -> Result<()> {
        queue!(self.buf, ResetColor)?;
        Ok(())
    }

    pub fn set_reverse(&mut self, on: bool) -> Result<()> {
        let attr = if on {
            Attribute::Reverse
        } else {
            Attribute::Reset
        };
        queue!(self.buf, SetAttribute(attr))?;
        Ok(())
    }

    pub fn clear_to_line_end(&mut self) -> Result<()> {
        queue!(self.buf, Clear(ClearType::UntilNewLine))?;
        Ok(())
    }

    /// Bytes accumulated so far; used by tests asserting frame content.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The single write of the frame contract.
    pub fn present(&self, out: &mut impl Write) -> Result<()> {
        out.write_all(&self.buf)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_writes_everything_in_one_call() {
        let mut frame = FrameBuffer::new();
        frame.hide_cursor().unwrap();
        frame.print("abc").unwrap();
        frame.show_cursor().unwrap();

        struct CountingSink {
            writes: usize,
            bytes: Vec<u8>,
        }
        impl Write for CountingSink {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.writes += 1;
                self.bytes.extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut sink = CountingSink {
            writes: 0,
            bytes: Vec::new(),
        };
        frame.present(&mut sink).unwrap();
        assert_eq!(sink.writes, 1);
        assert_eq!(sink.bytes, frame.as_bytes());
    }

    #[test]
    fn nothing_escapes_before_present() {
        let mut frame = FrameBuffer::new();
        frame.print("queued only").unwrap();
        assert!(!frame.is_empty());
        // content is still in memory, not on any terminal
        assert!(String::from_utf8_lossy(frame.as_bytes()).contains("queued only"));
    }
}

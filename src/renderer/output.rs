//! Output buffering and stateful cell rendering.
//!
//! - Batches a frame's escape sequences into one write
//! - Tracks terminal state to skip redundant cursor moves and colors
//!
//! Escape sequences come from crossterm commands queued into the buffer.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};

use crate::types::{Attr, Cell, Rgba};

// =============================================================================
// OutputBuffer
// =============================================================================

/// A buffer that accumulates output for batch writing.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(16384),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Write the accumulated bytes to `writer` and flush it.
    pub fn flush_to<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        writer.write_all(&self.data)?;
        writer.flush()?;
        self.data.clear();
        Ok(())
    }

    /// Get the accumulated data as a string (lossy).
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Buffering only; the real flush is `flush_to`
        Ok(())
    }
}

// =============================================================================
// Color conversion
// =============================================================================

/// Map a cell color to crossterm's color.
pub fn to_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        return Color::Reset;
    }
    Color::Rgb {
        r: color.r.clamp(0, 255) as u8,
        g: color.g.clamp(0, 255) as u8,
        b: color.b.clamp(0, 255) as u8,
    }
}

fn queue_attrs<W: Write>(out: &mut W, attrs: Attr) -> io::Result<()> {
    if attrs.contains(Attr::BOLD) {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if attrs.contains(Attr::DIM) {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    if attrs.contains(Attr::ITALIC) {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    if attrs.contains(Attr::UNDERLINE) {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    Ok(())
}

// =============================================================================
// StatefulCellRenderer
// =============================================================================

/// Renders cells while tracking terminal state to minimize output.
///
/// Tracks the last cursor position, colors and attributes; only changed
/// state is emitted.
#[derive(Debug)]
pub struct StatefulCellRenderer {
    last_x: i32,
    last_y: i32,
    last_fg: Option<Rgba>,
    last_bg: Option<Rgba>,
    last_attrs: Attr,
}

impl StatefulCellRenderer {
    pub fn new() -> Self {
        Self {
            last_x: -1,
            last_y: -1,
            last_fg: None,
            last_bg: None,
            last_attrs: Attr::NONE,
        }
    }

    /// Reset all tracked state. Call at the start of each frame.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Render a single cell, emitting only the state that changed.
    pub fn render_cell<W: Write>(&mut self, out: &mut W, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        // Continuation of a wide glyph: the terminal already advanced
        if cell.char == 0 {
            self.last_x = x as i32;
            self.last_y = y as i32;
            return Ok(());
        }

        if y as i32 != self.last_y || x as i32 != self.last_x + 1 {
            queue!(out, MoveTo(x, y))?;
        }

        if cell.attrs != self.last_attrs {
            queue!(out, SetAttribute(Attribute::Reset))?;
            queue_attrs(out, cell.attrs)?;
            // Reset clears colors too
            self.last_fg = None;
            self.last_bg = None;
            self.last_attrs = cell.attrs;
        }

        if self.last_fg != Some(cell.fg) {
            queue!(out, SetForegroundColor(to_color(cell.fg)))?;
            self.last_fg = Some(cell.fg);
        }

        if self.last_bg != Some(cell.bg) {
            queue!(out, SetBackgroundColor(to_color(cell.bg)))?;
            self.last_bg = Some(cell.bg);
        }

        let ch = char::from_u32(cell.char).unwrap_or(' ');
        queue!(out, Print(ch))?;

        self.last_x = x as i32;
        self.last_y = y as i32;
        Ok(())
    }
}

impl Default for StatefulCellRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(ch: char, fg: Rgba, bg: Rgba) -> Cell {
        Cell {
            char: ch as u32,
            fg,
            bg,
            attrs: Attr::NONE,
        }
    }

    #[test]
    fn test_output_buffer_flush_to() {
        let mut buf = OutputBuffer::new();
        write!(buf, "hello").unwrap();
        assert_eq!(buf.as_str(), "hello");

        let mut sink = Vec::new();
        buf.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"hello");
        assert!(buf.is_empty());
    }

    #[test]
    fn test_to_color() {
        assert_eq!(to_color(Rgba::TERMINAL_DEFAULT), Color::Reset);
        assert_eq!(to_color(Rgba::rgb(9, 9, 11)), Color::Rgb { r: 9, g: 9, b: 11 });
    }

    #[test]
    fn test_stateful_renderer_skips_sequential() {
        let mut renderer = StatefulCellRenderer::new();
        let mut output = OutputBuffer::new();
        let a = cell('A', Rgba::WHITE, Rgba::BLACK);

        renderer.render_cell(&mut output, 0, 0, &a).unwrap();
        let first_len = output.len();

        output.clear();
        renderer.render_cell(&mut output, 1, 0, &a).unwrap();
        assert_eq!(output.as_str(), "A");
        assert!(output.len() < first_len);
    }

    #[test]
    fn test_stateful_renderer_moves_on_gap() {
        let mut renderer = StatefulCellRenderer::new();
        let mut output = OutputBuffer::new();
        let x = cell('X', Rgba::WHITE, Rgba::BLACK);

        renderer.render_cell(&mut output, 0, 0, &x).unwrap();
        output.clear();
        renderer.render_cell(&mut output, 5, 0, &x).unwrap();

        // Cursor move plus glyph, no colors
        assert!(output.as_str().ends_with('X'));
        assert!(output.len() > 1);
        assert!(!output.as_str().contains("38;2"));
    }

    #[test]
    fn test_continuation_cell_skipped() {
        let mut renderer = StatefulCellRenderer::new();
        let mut output = OutputBuffer::new();

        renderer
            .render_cell(&mut output, 0, 0, &cell('\0', Rgba::WHITE, Rgba::BLACK))
            .unwrap();
        assert!(output.is_empty());
    }
}

//! FrameBuffer and drawing primitives.
//!
//! The FrameBuffer is a 2D grid of Cells that represents what should be
//! displayed on the terminal. The marquee paints into it; the diff renderer
//! flushes it.
//!
//! - **Flat storage**: `Vec<Cell>` with row-major indexing.
//! - **Clipping**: drawing functions accept an optional `ClipRect`.
//! - **Wide characters**: the cell after a wide glyph holds a continuation
//!   marker (`char == 0`).

use crate::layout::char_width;
use crate::types::{Attr, Cell, ClipRect, Rgba};

// =============================================================================
// FrameBuffer
// =============================================================================

/// A 2D buffer of terminal cells.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a new buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    /// Create a new buffer with a specific background color.
    pub fn with_background(width: u16, height: u16, bg: Rgba) -> Self {
        let mut buffer = Self::new(width, height);
        buffer.clear_with_bg(bg);
        buffer
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get the full buffer bounds as a ClipRect.
    #[inline]
    pub fn bounds(&self) -> ClipRect {
        ClipRect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Get a cell reference (returns None if out of bounds).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get a mutable cell reference (returns None if out of bounds).
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Clear the entire buffer to default cells.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Clear with a specific background color.
    pub fn clear_with_bg(&mut self, bg: Rgba) {
        self.cells.fill(Cell {
            char: b' ' as u32,
            fg: Rgba::TERMINAL_DEFAULT,
            bg,
            attrs: Attr::NONE,
        });
    }

    /// Resize the buffer (clears content).
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells
            .resize(width as usize * height as usize, Cell::default());
        self.clear();
    }

    /// Characters of one row, continuation cells skipped.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|cell| cell.char != 0)
            .filter_map(|cell| char::from_u32(cell.char))
            .collect()
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Set a single cell with optional clipping.
    ///
    /// A `None` background keeps the cell's current one. Returns true if the
    /// cell was set.
    pub fn set_cell(
        &mut self,
        x: u16,
        y: u16,
        char: u32,
        fg: Rgba,
        bg: Option<Rgba>,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        if let Some(clip) = clip {
            if !clip.contains(x, y) {
                return false;
            }
        }

        let idx = self.index(x, y);
        let cell = &mut self.cells[idx];
        cell.char = char;
        cell.fg = fg;
        if let Some(bg) = bg {
            cell.bg = bg;
        }
        cell.attrs = attrs;
        true
    }

    /// Draw text starting at a signed column.
    ///
    /// Glyphs left of column 0 or outside `clip` are skipped, so a label can
    /// slide in from the left edge. Returns the columns the text spans.
    pub fn draw_text(
        &mut self,
        x: i32,
        y: u16,
        text: &str,
        fg: Rgba,
        bg: Option<Rgba>,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> u16 {
        let mut col = x;

        for ch in text.chars() {
            if col >= self.width as i32 {
                break;
            }

            let w = char_width(ch) as i32;
            if w == 0 {
                continue;
            }

            if col >= 0 {
                let cx = col as u16;
                if self.set_cell(cx, y, ch as u32, fg, bg, attrs, clip) && w == 2 {
                    let next = cx.saturating_add(1);
                    if clip.map_or(true, |c| c.contains(next, y)) {
                        if let Some(cell) = self.get_mut(next, y) {
                            cell.char = 0;
                            cell.fg = fg;
                            cell.attrs = attrs;
                        }
                    }
                }
            }

            col += w;
        }

        (col - x).max(0) as u16
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_get() {
        let buf = FrameBuffer::new(4, 2);
        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 2);
        assert!(buf.get(3, 1).is_some());
        assert!(buf.get(4, 0).is_none());
    }

    #[test]
    fn test_set_cell_respects_clip() {
        let mut buf = FrameBuffer::new(10, 1);
        let clip = ClipRect::new(2, 0, 3, 1);

        assert!(!buf.set_cell(1, 0, 'a' as u32, Rgba::WHITE, None, Attr::NONE, Some(&clip)));
        assert!(buf.set_cell(2, 0, 'b' as u32, Rgba::WHITE, None, Attr::NONE, Some(&clip)));
        assert_eq!(buf.get(2, 0).unwrap().char, 'b' as u32);
    }

    #[test]
    fn test_set_cell_keeps_background_when_none() {
        let mut buf = FrameBuffer::with_background(3, 1, Rgba::SITE_BACKGROUND);
        buf.set_cell(0, 0, 'x' as u32, Rgba::WHITE, None, Attr::BOLD, None);
        let cell = buf.get(0, 0).unwrap();
        assert_eq!(cell.bg, Rgba::SITE_BACKGROUND);
        assert_eq!(cell.attrs, Attr::BOLD);
    }

    #[test]
    fn test_draw_text_negative_start() {
        let mut buf = FrameBuffer::with_background(6, 1, Rgba::BLACK);
        let used = buf.draw_text(-2, 0, "Python", Rgba::WHITE, None, Attr::NONE, None);
        assert_eq!(used, 6);
        assert_eq!(buf.row_text(0), "thon  ");
    }

    #[test]
    fn test_draw_text_truncates_at_edge() {
        let mut buf = FrameBuffer::with_background(4, 1, Rgba::BLACK);
        buf.draw_text(2, 0, "React", Rgba::WHITE, None, Attr::NONE, None);
        assert_eq!(buf.row_text(0), "  Re");
    }

    #[test]
    fn test_draw_text_wide_char_continuation() {
        let mut buf = FrameBuffer::new(4, 1);
        let used = buf.draw_text(0, 0, "日a", Rgba::WHITE, None, Attr::NONE, None);
        assert_eq!(used, 3);
        assert_eq!(buf.get(1, 0).unwrap().char, 0);
        assert_eq!(buf.get(2, 0).unwrap().char, 'a' as u32);
    }

    #[test]
    fn test_resize_clears() {
        let mut buf = FrameBuffer::with_background(2, 1, Rgba::WHITE);
        buf.resize(3, 2);
        assert_eq!(buf.get(2, 1), Some(&Cell::default()));
    }
}

//! Differential renderer for fullscreen mode.
//!
//! Compares the current frame to the previous one and only outputs cells
//! that changed. The marquee repaints its whole row every frame, but most
//! cells of a slowly scrolling track stay the same between frames.
//!
//! # Algorithm
//!
//! 1. Wrap output in a synchronized update
//! 2. For each cell in the new frame, skip it if unchanged, else render it
//! 3. Flush the output buffer to the writer in one write
//! 4. Store the current frame for the next comparison

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Attribute, SetAttribute};
use crossterm::terminal::{
    BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
    LeaveAlternateScreen,
};

use super::buffer::FrameBuffer;
use super::output::{OutputBuffer, StatefulCellRenderer};

/// Differential renderer for fullscreen mode.
pub struct DiffRenderer {
    output: OutputBuffer,
    cell_renderer: StatefulCellRenderer,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self {
            output: OutputBuffer::new(),
            cell_renderer: StatefulCellRenderer::new(),
            previous: None,
        }
    }

    /// Render a frame to `out`, writing only changed cells.
    ///
    /// Returns the number of cells written.
    pub fn render<W: Write>(&mut self, buffer: &FrameBuffer, out: &mut W) -> io::Result<usize> {
        let mut changed = 0;

        queue!(self.output, BeginSynchronizedUpdate)?;
        self.cell_renderer.reset();

        let width = buffer.width();
        let height = buffer.height();
        let previous = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == width && prev.height() == height);

        for y in 0..height {
            for x in 0..width {
                let Some(cell) = buffer.get(x, y) else {
                    continue;
                };
                if previous.and_then(|prev| prev.get(x, y)) == Some(cell) {
                    continue;
                }
                changed += 1;
                self.cell_renderer.render_cell(&mut self.output, x, y, cell)?;
            }
        }

        queue!(self.output, EndSynchronizedUpdate)?;
        self.output.flush_to(out)?;

        self.previous = Some(buffer.clone());
        Ok(changed)
    }

    /// Invalidate the previous frame. The next render is a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Enter fullscreen mode (alternate screen buffer, hidden cursor).
    pub fn enter_fullscreen<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        queue!(
            self.output,
            EnterAlternateScreen,
            Hide,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;
        self.output.flush_to(out)?;
        self.invalidate();
        Ok(())
    }

    /// Exit fullscreen mode.
    pub fn exit_fullscreen<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        queue!(
            self.output,
            SetAttribute(Attribute::Reset),
            Show,
            LeaveAlternateScreen
        )?;
        self.output.flush_to(out)
    }
}

impl Default for DiffRenderer {
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
    use crate::types::{Attr, Rgba};

    fn frame(text: &str) -> FrameBuffer {
        let mut buffer = FrameBuffer::with_background(8, 1, Rgba::BLACK);
        buffer.draw_text(0, 0, text, Rgba::WHITE, None, Attr::NONE, None);
        buffer
    }

    #[test]
    fn test_diff_renderer_creation() {
        let renderer = DiffRenderer::new();
        assert!(!renderer.has_previous());
    }

    #[test]
    fn test_first_frame_writes_everything() {
        let mut renderer = DiffRenderer::new();
        let mut sink = Vec::new();

        let changed = renderer.render(&frame("Rust"), &mut sink).unwrap();
        assert_eq!(changed, 8);
        assert!(String::from_utf8_lossy(&sink).contains("Rust"));
    }

    #[test]
    fn test_second_frame_writes_only_changes() {
        let mut renderer = DiffRenderer::new();
        let mut sink = Vec::new();

        renderer.render(&frame("Rust"), &mut sink).unwrap();
        sink.clear();

        let changed = renderer.render(&frame("Rest"), &mut sink).unwrap();
        assert_eq!(changed, 1);

        let unchanged = renderer.render(&frame("Rest"), &mut sink).unwrap();
        assert_eq!(unchanged, 0);
    }

    #[test]
    fn test_invalidate_forces_full_redraw() {
        let mut renderer = DiffRenderer::new();
        let mut sink = Vec::new();

        renderer.render(&frame("Git"), &mut sink).unwrap();
        renderer.invalidate();
        assert!(!renderer.has_previous());

        let changed = renderer.render(&frame("Git"), &mut sink).unwrap();
        assert_eq!(changed, 8);
    }

    #[test]
    fn test_size_change_forces_full_redraw() {
        let mut renderer = DiffRenderer::new();
        let mut sink = Vec::new();

        renderer.render(&frame("C"), &mut sink).unwrap();
        let wider = FrameBuffer::with_background(10, 1, Rgba::BLACK);
        assert_eq!(renderer.render(&wider, &mut sink).unwrap(), 10);
    }
}

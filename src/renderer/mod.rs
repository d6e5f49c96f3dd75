//! Terminal renderer - the "blind" output layer.
//!
//! The renderer knows only about cells. It doesn't understand the marquee,
//! layout, or scrolling. It takes a filled FrameBuffer and writes the changed
//! cells as crossterm commands.

pub mod buffer;
pub mod diff;
pub mod output;

pub use buffer::FrameBuffer;
pub use diff::DiffRenderer;
pub use output::{OutputBuffer, StatefulCellRenderer};

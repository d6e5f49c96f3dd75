//! State Module - Runtime state systems
//!
//! - **Animate** - Shared per-FPS frame clocks
//! - **Pointer** - Region tracking, capture, hover enter/leave
//! - **Input** - crossterm event conversion and polling

pub mod animate;
pub mod input;
pub mod pointer;

pub use animate::{FrameSubscription, subscribe_to_frames};
pub use input::{InputEvent, KeyPress, poll_event};
pub use pointer::{MouseAction, MouseEvent, PointerAction, PointerEvent, PointerTracker};

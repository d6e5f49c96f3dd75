//! Input Module - Event conversion and polling
//!
//! Bridges crossterm's event system with the pointer module.
//!
//! # API
//!
//! - `convert_mouse_event` - Convert crossterm MouseEvent to our MouseEvent
//! - `convert_key_event` - Convert crossterm KeyEvent to a `KeyPress`
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//! - `enable_mouse` / `disable_mouse` - Control mouse capture
//!
//! # Example
//!
//! ```ignore
//! use skill_marquee::state::input::{poll_event, InputEvent};
//! use std::time::Duration;
//!
//! loop {
//!     match poll_event(Duration::from_millis(16))? {
//!         Some(InputEvent::Mouse(mouse)) => marquee.handle_mouse(&mouse),
//!         Some(InputEvent::Key(key)) if key.is_quit() => break,
//!         _ => {}
//!     }
//! }
//! ```

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode, KeyEventKind,
    KeyModifiers, KeyEvent as CrosstermKeyEvent, MouseButton as CrosstermMouseButton,
    MouseEvent as CrosstermMouseEvent, MouseEventKind, poll, read,
};
use crossterm::execute;
use std::io::stdout;
use std::time::Duration;

use super::pointer::{MouseAction, MouseEvent};

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// A key press, reduced to what the demo loop needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
        }
    }

    /// `q`, `Escape`, or `Ctrl+C`.
    pub fn is_quit(&self) -> bool {
        matches!(self.key.as_str(), "q" | "Escape") || (self.ctrl && self.key == "c")
    }
}

/// Unified event type
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Mouse event (press, drag, release, move)
    Mouse(MouseEvent),
    /// Key press
    Key(KeyPress),
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// No event or unhandled event type
    None,
}

// =============================================================================
// EVENT CONVERSION
// =============================================================================

/// Convert crossterm MouseEvent to our MouseEvent.
///
/// Only the primary button drives the pointer; other buttons and the wheel
/// map to `MouseAction::Other`.
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> MouseEvent {
    let action = match event.kind {
        MouseEventKind::Down(CrosstermMouseButton::Left) => MouseAction::Down,
        MouseEventKind::Up(CrosstermMouseButton::Left) => MouseAction::Up,
        MouseEventKind::Drag(CrosstermMouseButton::Left) => MouseAction::Drag,
        MouseEventKind::Moved => MouseAction::Move,
        _ => MouseAction::Other,
    };

    MouseEvent::new(action, event.column, event.row)
}

/// Convert crossterm KeyEvent to a `KeyPress`. Releases and unnamed keys
/// yield `None`.
pub fn convert_key_event(event: CrosstermKeyEvent) -> Option<KeyPress> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        _ => return None,
    };

    Some(KeyPress {
        key,
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
    })
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    Ok(convert_event(read()?))
}

fn convert_event(event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Mouse(mouse) => InputEvent::Mouse(convert_mouse_event(mouse)),
        CrosstermEvent::Key(key) => convert_key_event(key)
            .map(InputEvent::Key)
            .unwrap_or(InputEvent::None),
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================

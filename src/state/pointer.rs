//! Pointer Module - Pointer state and region tracking
//!
//! Turns raw terminal mouse events into the pointer events a marquee
//! reacts to (down, move, up, enter, leave), relative to its region.
//!
//! # API
//!
//! - `PointerTracker::route(event)` - Region-relative pointer event, if any
//! - `record(event)` - Remember the last raw event
//! - `last_event()` - Read it back, e.g. to restore hover after a resize
//!
//! A press inside the region captures the pointer: moves and the release
//! are delivered even if they happen outside the region, like a browser's
//! pointer capture. Without a press, crossing the region edge yields
//! `Enter`/`Leave`.
//!
//! # Example
//!
//! ```ignore
//! use skill_marquee::state::pointer::{PointerTracker, MouseEvent};
//!
//! let mut tracker = PointerTracker::new(ClipRect::new(0, 5, 80, 1));
//! if let Some(pointer) = tracker.route(&MouseEvent::down(10, 5)) {
//!     marquee.handle_pointer(pointer);
//! }
//! ```

use spark_signals::{Signal, signal};

use crate::types::ClipRect;

// =============================================================================
// RAW MOUSE EVENTS
// =============================================================================

/// Mouse action type, as reported by the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    /// Primary button pressed
    Down,
    /// Primary button released
    Up,
    /// Motion with the primary button held
    Drag,
    /// Motion without a button
    Move,
    /// Anything else (other buttons, wheel)
    Other,
}

/// Mouse event in terminal cell coordinates (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub action: MouseAction,
    pub x: u16,
    pub y: u16,
}

impl MouseEvent {
    pub fn new(action: MouseAction, x: u16, y: u16) -> Self {
        Self { action, x, y }
    }

    pub fn down(x: u16, y: u16) -> Self {
        Self::new(MouseAction::Down, x, y)
    }

    pub fn up(x: u16, y: u16) -> Self {
        Self::new(MouseAction::Up, x, y)
    }

    pub fn drag(x: u16, y: u16) -> Self {
        Self::new(MouseAction::Drag, x, y)
    }

    pub fn move_to(x: u16, y: u16) -> Self {
        Self::new(MouseAction::Move, x, y)
    }
}

// =============================================================================
// POINTER EVENTS
// =============================================================================

/// Pointer action relative to a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Down,
    Move,
    Up,
    Enter,
    Leave,
}

/// Pointer event delivered to a component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub x: u16,
    pub y: u16,
}

impl PointerEvent {
    fn new(action: PointerAction, event: &MouseEvent) -> Self {
        Self {
            action,
            x: event.x,
            y: event.y,
        }
    }
}

// =============================================================================
// REGION TRACKER
// =============================================================================

/// Tracks hover and capture for one component region.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    region: ClipRect,
    hovering: bool,
    captured: bool,
}

impl PointerTracker {
    pub fn new(region: ClipRect) -> Self {
        Self {
            region,
            hovering: false,
            captured: false,
        }
    }

    pub fn region(&self) -> ClipRect {
        self.region
    }

    /// Move the region (terminal resize). Releases any capture.
    pub fn set_region(&mut self, region: ClipRect) {
        self.region = region;
        self.captured = false;
        self.hovering = false;
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Re-derive hover from a known pointer position, e.g. after the region
    /// moved under a pointer that has not moved since. No-op while captured.
    pub fn resume_hover(&mut self, x: u16, y: u16) -> bool {
        if !self.captured {
            self.hovering = self.region.contains(x, y);
        }
        self.hovering
    }

    /// Translate a raw event into a pointer event for this region.
    pub fn route(&mut self, event: &MouseEvent) -> Option<PointerEvent> {
        let inside = self.region.contains(event.x, event.y);

        match event.action {
            MouseAction::Down if inside => {
                self.captured = true;
                self.hovering = true;
                Some(PointerEvent::new(PointerAction::Down, event))
            }
            MouseAction::Drag | MouseAction::Move if self.captured => {
                self.hovering = inside;
                Some(PointerEvent::new(PointerAction::Move, event))
            }
            MouseAction::Up if self.captured => {
                self.captured = false;
                self.hovering = inside;
                Some(PointerEvent::new(PointerAction::Up, event))
            }
            MouseAction::Drag | MouseAction::Move | MouseAction::Up => {
                if inside && !self.hovering {
                    self.hovering = true;
                    Some(PointerEvent::new(PointerAction::Enter, event))
                } else if !inside && self.hovering {
                    self.hovering = false;
                    Some(PointerEvent::new(PointerAction::Leave, event))
                } else if inside {
                    Some(PointerEvent::new(PointerAction::Move, event))
                } else {
                    None
                }
            }
            MouseAction::Down | MouseAction::Other => None,
        }
    }
}

// =============================================================================
// REACTIVE STATE
// =============================================================================

thread_local! {
    static LAST_EVENT: Signal<Option<MouseEvent>> = signal(None);
}

/// Record a raw event as the pointer's last known state.
pub fn record(event: &MouseEvent) {
    LAST_EVENT.with(|s| s.set(Some(*event)));
}

/// Get the last mouse event, if any arrived yet
pub fn last_event() -> Option<MouseEvent> {
    LAST_EVENT.with(|s| s.get())
}

/// Reset pointer state (for testing).
pub fn reset_pointer_state() {
    LAST_EVENT.with(|s| s.set(None));
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() {
        reset_pointer_state();
    }

    fn tracker() -> PointerTracker {
        PointerTracker::new(ClipRect::new(0, 5, 40, 1))
    }

    fn actions(tracker: &mut PointerTracker, events: &[MouseEvent]) -> Vec<Option<PointerAction>> {
        events
            .iter()
            .map(|e| tracker.route(e).map(|p| p.action))
            .collect()
    }

    #[test]
    fn test_press_drag_release_inside() {
        let mut t = tracker();
        let got = actions(
            &mut t,
            &[
                MouseEvent::down(10, 5),
                MouseEvent::drag(12, 5),
                MouseEvent::up(12, 5),
            ],
        );
        assert_eq!(
            got,
            vec![
                Some(PointerAction::Down),
                Some(PointerAction::Move),
                Some(PointerAction::Up)
            ]
        );
        assert!(!t.is_captured());
        assert!(t.is_hovering());
    }

    #[test]
    fn test_capture_keeps_drag_outside_region() {
        let mut t = tracker();
        t.route(&MouseEvent::down(10, 5));

        let moved = t.route(&MouseEvent::drag(50, 9)).unwrap();
        assert_eq!(moved.action, PointerAction::Move);
        assert_eq!(moved.x, 50);
        assert!(!t.is_hovering());

        let released = t.route(&MouseEvent::up(50, 9)).unwrap();
        assert_eq!(released.action, PointerAction::Up);
        assert!(!t.is_captured());
    }

    #[test]
    fn test_hover_enter_leave() {
        let mut t = tracker();
        let got = actions(
            &mut t,
            &[
                MouseEvent::move_to(5, 0),
                MouseEvent::move_to(5, 5),
                MouseEvent::move_to(6, 5),
                MouseEvent::move_to(6, 6),
                MouseEvent::move_to(7, 6),
            ],
        );
        assert_eq!(
            got,
            vec![
                None,
                Some(PointerAction::Enter),
                Some(PointerAction::Move),
                Some(PointerAction::Leave),
                None
            ]
        );
    }

    #[test]
    fn test_down_outside_ignored() {
        let mut t = tracker();
        assert_eq!(t.route(&MouseEvent::down(10, 0)), None);
        assert!(!t.is_captured());
        assert_eq!(t.route(&MouseEvent::drag(10, 5)).map(|p| p.action), Some(PointerAction::Enter));
    }

    #[test]
    fn test_set_region_releases_capture() {
        let mut t = tracker();
        t.route(&MouseEvent::down(1, 5));
        t.set_region(ClipRect::new(0, 0, 10, 1));
        assert!(!t.is_captured());
        assert!(!t.is_hovering());
    }

    #[test]
    fn test_resume_hover() {
        let mut t = tracker();
        assert!(t.resume_hover(3, 5));
        assert!(!t.resume_hover(3, 6));

        // Capture wins until release
        t.route(&MouseEvent::down(3, 5));
        assert!(t.resume_hover(3, 9));
    }

    #[test]
    fn test_record_keeps_last_event() {
        setup();
        assert_eq!(last_event(), None);

        record(&MouseEvent::down(3, 4));
        record(&MouseEvent::up(8, 4));
        assert_eq!(last_event(), Some(MouseEvent::up(8, 4)));
    }
}

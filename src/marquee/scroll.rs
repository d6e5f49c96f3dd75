//! Scroll loop - the offset state machine behind the marquee track.
//!
//! ```text
//! Uninitialized ──measure(W > 0)──► Ready(Auto) ◄──up / leave── Ready(Dragging)
//!                                        └──────────down (interactive)──────┘
//! ```
//!
//! The offset is in cells and always wrapped into `(-2W, 0]`, where `W` is
//! the width of one unrepeated pass of the items. Since every pass is
//! identical, shifting by `W` is invisible.

use crate::config::MarqueeConfig;
use crate::types::Direction;

/// Minimum number of copies of the item list on the track.
pub const MIN_REPEATS: usize = 10;

// =============================================================================
// STATE
// =============================================================================

/// Interaction mode once the width is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    Auto,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    /// Width not measured (or measured as zero). Nothing renders.
    Uninitialized,
    Ready(ScrollMode),
}

/// Offset state of one mounted marquee.
#[derive(Debug, Clone)]
pub struct ScrollLoop {
    phase: ScrollPhase,
    offset: f32,
    width: f32,
    speed: f32,
    direction: Direction,
    interactive: bool,
    pause_on_hover: bool,
    reduced_motion: bool,
    hovered: bool,
    last_x: f32,
    last_delta: f32,
}

impl ScrollLoop {
    pub fn new(config: &MarqueeConfig) -> Self {
        Self {
            phase: ScrollPhase::Uninitialized,
            offset: 0.0,
            width: 0.0,
            speed: config.speed,
            direction: config.direction,
            interactive: config.interactive,
            pause_on_hover: config.pause_on_hover,
            reduced_motion: config.reduced_motion,
            hovered: false,
            last_x: 0.0,
            last_delta: 0.0,
        }
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Width of one pass, 0 while uninitialized.
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, ScrollPhase::Ready(_))
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == ScrollPhase::Ready(ScrollMode::Dragging)
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Record the measured width of one pass.
    ///
    /// A positive width (re)starts the track at `-W`; anything else makes the
    /// loop inert. Re-measuring with the same width is a no-op. A drag in
    /// progress survives a new width.
    pub fn measure(&mut self, width: f32) {
        if !(width.is_finite() && width > 0.0) {
            if self.phase != ScrollPhase::Uninitialized {
                tracing::debug!(width, "marquee width unmeasurable, going inert");
            }
            self.phase = ScrollPhase::Uninitialized;
            self.width = 0.0;
            self.offset = 0.0;
            return;
        }

        if self.is_ready() && self.width == width {
            return;
        }

        let mode = match self.phase {
            ScrollPhase::Ready(mode) => mode,
            ScrollPhase::Uninitialized => ScrollMode::Auto,
        };
        self.width = width;
        self.offset = -width;
        self.phase = ScrollPhase::Ready(mode);
        tracing::debug!(width, ?mode, "marquee measured");
    }

    // =========================================================================
    // Animation
    // =========================================================================

    /// Whether the next `step` would move the track.
    pub fn is_animating(&self) -> bool {
        self.phase == ScrollPhase::Ready(ScrollMode::Auto)
            && !self.reduced_motion
            && !(self.pause_on_hover && self.hovered)
    }

    /// Advance one frame of auto-scroll. Returns true if the offset moved.
    pub fn step(&mut self) -> bool {
        if !self.is_animating() {
            return false;
        }
        self.offset = wrap_offset(self.offset + self.direction.sign() * self.speed, self.width);
        true
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    /// Start a drag at column `x`. Returns true if dragging started.
    pub fn pointer_down(&mut self, x: f32) -> bool {
        if !self.interactive || !self.is_ready() {
            return false;
        }
        self.phase = ScrollPhase::Ready(ScrollMode::Dragging);
        self.last_x = x;
        self.last_delta = 0.0;
        tracing::debug!(x, "drag start");
        true
    }

    /// Pan by the pointer's movement since the last event.
    pub fn pointer_move(&mut self, x: f32) -> bool {
        if !self.is_dragging() {
            return false;
        }
        let delta = x - self.last_x;
        self.last_x = x;
        self.last_delta = delta;
        self.offset = wrap_offset(self.offset + delta, self.width);
        true
    }

    /// End a drag; the last delta's sign picks the new direction.
    pub fn pointer_up(&mut self) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.phase = ScrollPhase::Ready(ScrollMode::Auto);
        self.direction = Direction::from_delta(self.last_delta);
        tracing::debug!(direction = ?self.direction, delta = self.last_delta, "drag end");
        true
    }

    /// Pointer left the region. Ends a drag like a release and clears hover.
    pub fn pointer_leave(&mut self) -> bool {
        self.hovered = false;
        self.pointer_up()
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }
}

// =============================================================================
// WRAPPING
// =============================================================================

/// Wrap `offset` into `(-2W, 0]` by whole multiples of `W`.
///
/// Same result as repeatedly adding `W` while `offset <= -2W` and
/// subtracting it while `offset > 0`, without the loop. Values already in
/// range are returned unchanged. A non-positive `W` returns `offset` as is.
pub fn wrap_offset(offset: f32, width: f32) -> f32 {
    if !(width.is_finite() && width > 0.0) || !offset.is_finite() {
        return offset;
    }

    let mut wrapped = offset;
    if wrapped > 0.0 {
        wrapped -= (wrapped / width).ceil() * width;
    } else if wrapped <= -2.0 * width {
        wrapped += ((-2.0 * width - wrapped) / width).floor() * width + width;
    }

    // Rounding at the boundaries
    while wrapped > 0.0 {
        wrapped -= width;
    }
    while wrapped <= -2.0 * width {
        wrapped += width;
    }
    wrapped
}

/// Copies of the item list needed so a wrapped track always covers the
/// viewport on both sides of the wrap point.
pub fn repeats_needed(viewport_width: f32, width: f32) -> usize {
    if !(width.is_finite() && width > 0.0) {
        return MIN_REPEATS;
    }
    let needed = (3.0 * viewport_width.max(0.0) / width).ceil() as usize;
    needed.max(MIN_REPEATS)
}

// =============================================================================
// TESTS
// =============================================================================

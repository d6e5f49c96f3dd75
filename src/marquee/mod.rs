//! Marquee component - an endlessly scrolling row of technologies.
//!
//! Composes the icon resolver and the scroll loop:
//!
//! - **item** - Label plus per-item icon fallback
//! - **scroll** - Offset state machine, wrapping, drag input
//!
//! The component owns logical state only. Each frame the embedding loop
//! feeds it the index snapshot, load outcomes, frames and pointer events,
//! then asks it to paint into a [`FrameBuffer`].
//!
//! # Example
//!
//! ```ignore
//! let mut marquee = Marquee::new(config, IconResolver::new(&resolver_cfg))?;
//! marquee.mount(ClipRect::new(0, 10, width, 1));
//!
//! loop {
//!     marquee.sync_index(&cache.snapshot())?;
//!     marquee.request_icons(&mut loader);
//!     marquee.apply_loads(loader.poll());
//!     marquee.tick();
//!     marquee.render(&mut buffer);
//!     renderer.render(&buffer, &mut stdout)?;
//! }
//! ```

pub mod item;
pub mod scroll;

pub use item::{GLYPH_LOADED, GLYPH_PENDING, TechItem};
pub use scroll::{ScrollLoop, ScrollMode, ScrollPhase, repeats_needed, wrap_offset};

use std::collections::HashSet;

use crate::config::MarqueeConfig;
use crate::error::Result;
use crate::icons::{IconLoader, IconResolver, IconStatus, IndexSnapshot, LoadEvent, SlotChange};
use crate::layout::{ItemSpec, TrackLayout, measure_track};
use crate::renderer::FrameBuffer;
use crate::state::animate::{FrameSubscription, subscribe_to_frames};
use crate::state::pointer::{self, MouseEvent, PointerAction, PointerEvent, PointerTracker};
use crate::types::{Attr, ClipRect, Rgba};

/// Frames replayed at most per tick after the UI thread stalls.
pub const MAX_CATCHUP_FRAMES: u64 = 4;

// =============================================================================
// MARQUEE
// =============================================================================

pub struct Marquee {
    config: MarqueeConfig,
    resolver: IconResolver,
    items: Vec<TechItem>,
    layout: TrackLayout,
    scroll: ScrollLoop,
    snapshot: IndexSnapshot,
    pointer: PointerTracker,
    frames: Option<FrameSubscription>,
    /// URLs asked of the loader whose outcome has not been applied yet.
    requested: HashSet<String>,
}

impl Marquee {
    /// Build the items against a not-yet-loaded index and measure one pass.
    pub fn new(config: MarqueeConfig, resolver: IconResolver) -> Result<Self> {
        config.validate()?;

        let snapshot = IndexSnapshot::Loading;
        let items = config
            .technologies
            .iter()
            .map(|name| TechItem::resolve(name, &resolver, &snapshot))
            .collect();

        let mut marquee = Self {
            scroll: ScrollLoop::new(&config),
            config,
            resolver,
            items,
            layout: TrackLayout::default(),
            snapshot,
            pointer: PointerTracker::new(ClipRect::new(0, 0, 0, 0)),
            frames: None,
            requested: HashSet::new(),
        };
        marquee.remeasure()?;
        Ok(marquee)
    }

    pub fn config(&self) -> &MarqueeConfig {
        &self.config
    }

    pub fn items(&self) -> &[TechItem] {
        &self.items
    }

    pub fn scroll(&self) -> &ScrollLoop {
        &self.scroll
    }

    pub fn layout(&self) -> &TrackLayout {
        &self.layout
    }

    pub fn region(&self) -> ClipRect {
        self.pointer.region()
    }

    pub fn is_ready(&self) -> bool {
        self.scroll.is_ready()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Place the marquee in `region` and start receiving frames.
    pub fn mount(&mut self, region: ClipRect) {
        self.set_region(region);
        if self.frames.is_none() {
            self.frames = Some(subscribe_to_frames(self.config.fps));
        }
    }

    /// Stop the animation. The marquee keeps its state but no longer ticks.
    pub fn unmount(&mut self) {
        if let Some(frames) = self.frames.take() {
            frames.cancel();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.frames.is_some()
    }

    /// Move or resize the region (terminal resize). Ends any drag.
    ///
    /// Hover is restored from the last recorded pointer position, so a
    /// pointer resting over the new region still pauses a hover-paused track.
    pub fn set_region(&mut self, region: ClipRect) {
        if self.pointer.region() != region {
            self.scroll.pointer_leave();
            self.pointer.set_region(region);
            if let Some(last) = pointer::last_event() {
                let hovering = self.pointer.resume_hover(last.x, last.y);
                self.scroll.set_hovered(hovering);
            }
        }
    }

    // =========================================================================
    // Icon resolution
    // =========================================================================

    /// Re-resolve curated items if the index snapshot changed.
    ///
    /// Returns true if anything was re-resolved. Re-measures (restarting the
    /// scroll from `-W`) only when an icon column appeared or vanished.
    pub fn sync_index(&mut self, snapshot: &IndexSnapshot) -> Result<bool> {
        if *snapshot == self.snapshot {
            return Ok(false);
        }
        self.snapshot = snapshot.clone();

        let mut relayout = false;
        for item in &mut self.items {
            relayout |= item.refresh(&self.resolver, snapshot);
        }
        if relayout {
            self.remeasure()?;
        }
        Ok(true)
    }

    /// Distinct URLs currently waiting on a load outcome, in track order.
    pub fn pending_requests(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .filter(|item| item.slot().status() == IconStatus::Pending)
            .filter_map(|item| item.slot().current())
            .filter(|url| seen.insert(*url))
            .map(str::to_string)
            .collect()
    }

    /// Ask `loader` for every pending URL not already asked for.
    ///
    /// Returns the number of new requests.
    pub fn request_icons(&mut self, loader: &mut IconLoader) -> usize {
        let mut sent = 0;
        for url in self.pending_requests() {
            if self.requested.insert(url.clone()) {
                loader.request(&url);
                sent += 1;
            }
        }
        sent
    }

    /// Apply load outcomes to every item showing the URL.
    ///
    /// Each item advances through its own candidates. Returns true if any
    /// item changed.
    pub fn apply_loads(&mut self, events: impl IntoIterator<Item = LoadEvent>) -> bool {
        let mut changed = false;
        for event in events {
            self.requested.remove(&event.url);
            for item in &mut self.items {
                changed |= item.apply(&event) != SlotChange::Ignored;
            }
        }
        changed
    }

    fn remeasure(&mut self) -> Result<()> {
        let specs: Vec<ItemSpec> = self.items.iter().map(TechItem::spec).collect();
        self.layout = measure_track(&specs, self.config.item_margin)?;
        self.scroll.measure(self.layout.width);
        Ok(())
    }

    // =========================================================================
    // Animation and input
    // =========================================================================

    /// Consume pending frames from the clock. Returns true if the track moved.
    pub fn tick(&mut self) -> bool {
        let pending = match self.frames.as_mut() {
            Some(frames) => frames.take_pending(MAX_CATCHUP_FRAMES),
            None => 0,
        };
        self.advance(pending)
    }

    /// Run `frames` auto-scroll steps.
    pub fn advance(&mut self, frames: u64) -> bool {
        let mut moved = false;
        for _ in 0..frames {
            moved |= self.scroll.step();
        }
        moved
    }

    /// Feed a raw mouse event. Returns true if the scroll state reacted.
    pub fn handle_mouse(&mut self, event: &MouseEvent) -> bool {
        pointer::record(event);
        match self.pointer.route(event) {
            Some(pointer) => self.handle_pointer(pointer),
            None => false,
        }
    }

    /// Feed a region-relative pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let x = event.x as f32;
        match event.action {
            PointerAction::Down => {
                self.scroll.set_hovered(true);
                self.scroll.pointer_down(x)
            }
            PointerAction::Move => {
                self.scroll.set_hovered(self.pointer.is_hovering());
                self.scroll.pointer_move(x)
            }
            PointerAction::Up => {
                let ended = self.scroll.pointer_up();
                self.scroll.set_hovered(self.pointer.is_hovering());
                ended
            }
            PointerAction::Enter => {
                self.scroll.set_hovered(true);
                false
            }
            PointerAction::Leave => self.scroll.pointer_leave(),
        }
    }

    // =========================================================================
    // Painting
    // =========================================================================

    /// Row of the region the track is painted on.
    pub fn track_row(&self) -> u16 {
        let region = self.region();
        region.y + region.height / 2
    }

    /// Paint the visible part of the track into `buffer`.
    ///
    /// Paints nothing until the width is measured.
    pub fn render(&self, buffer: &mut FrameBuffer) {
        if !self.is_ready() {
            return;
        }
        let region = self.region();
        if region.width == 0 || region.height == 0 {
            return;
        }
        let style = &self.config.style;

        for y in region.y..region.y.saturating_add(region.height) {
            for x in region.x..region.x.saturating_add(region.width) {
                buffer.set_cell(x, y, b' ' as u32, style.label, Some(style.background), Attr::NONE, None);
            }
        }

        let row = self.track_row();
        let width = self.scroll.width();
        let offset = self.scroll.offset();
        let viewport = region.width as f32;
        let to_col = |pos: f32| region.x as i32 + pos.floor() as i32;

        for copy in 0..repeats_needed(viewport, width) {
            let base = offset + copy as f32 * width;
            if base >= viewport {
                break;
            }
            if base + width <= 0.0 {
                continue;
            }

            for (item, bounds) in self.items.iter().zip(&self.layout.items) {
                if let (Some(icon_x), Some(glyph)) = (bounds.icon_x, item.glyph()) {
                    let color = match item.slot().status() {
                        IconStatus::Loaded => style.icon,
                        _ => style.icon_pending,
                    };
                    let mut utf8 = [0u8; 4];
                    buffer.draw_text(
                        to_col(base + icon_x),
                        row,
                        glyph.encode_utf8(&mut utf8),
                        color,
                        None,
                        Attr::NONE,
                        Some(&region),
                    );
                }
                buffer.draw_text(
                    to_col(base + bounds.label_x),
                    row,
                    item.name(),
                    style.label,
                    None,
                    Attr::NONE,
                    Some(&region),
                );
            }
        }

        self.paint_fades(buffer, region);
    }

    /// Fade glyphs into the background near both edges.
    fn paint_fades(&self, buffer: &mut FrameBuffer, region: ClipRect) {
        let fade = self.config.gradient_width.min(region.width / 2);
        if fade == 0 {
            return;
        }
        let background = self.config.style.background;
        let right_edge = region.x + region.width - 1;

        for step in 0..fade {
            let t = (step as f32 + 1.0) / (fade as f32 + 1.0);
            for y in region.y..region.y.saturating_add(region.height) {
                for x in [region.x + step, right_edge - step] {
                    if let Some(cell) = buffer.get_mut(x, y) {
                        cell.fg = Rgba::lerp(background, cell.fg, t);
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for Marquee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Marquee")
            .field("items", &self.items.len())
            .field("phase", &self.scroll.phase())
            .field("offset", &self.scroll.offset())
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! # skill-marquee
//!
//! An endlessly scrolling, draggable row of technology names and icons for
//! the terminal.
//!
//! ## Architecture
//!
//! Two pieces compose:
//!
//! - The **icon resolver** maps a technology name to an ordered list of
//!   candidate icon URLs. A small allow-list is matched against a curated
//!   remote index, fetched once per [`IconIndexCache`]; everything else uses
//!   a slug-based CDN convention.
//! - The **scroll loop** keeps a wrapped offset for a track made of repeated
//!   copies of the item list, stepped by a frame clock and panned by pointer
//!   drags.
//!
//! Rendering never waits on resolution. Items show their label at once and
//! gain an icon glyph when a candidate resolves and loads:
//!
//! ```text
//! IndexSnapshot ─┐
//! LoadEvents ────┼─► Marquee ─► FrameBuffer ─► DiffRenderer ─► terminal
//! frames/pointer ┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Colors, cells, rects, direction
//! - [`config`] - Component and resolver configuration
//! - [`icons`] - Index cache, resolver, per-item fallback, loader
//! - [`layout`] - Taffy measurement of one pass of the track
//! - [`marquee`] - The component and its scroll loop
//! - [`state`] - Frame clocks, pointer tracking, terminal input
//! - [`renderer`] - FrameBuffer and diff rendering

pub mod config;
pub mod error;
pub mod icons;
pub mod layout;
pub mod marquee;
pub mod renderer;
pub mod state;
pub mod types;

pub use types::*;

pub use config::{MarqueeConfig, MarqueeStyle, ResolverConfig, Settings};
pub use error::{Error, Result};

pub use icons::{
    HttpIconProbe, HttpIndexSource, IconIndex, IconIndexCache, IconIndexEntry, IconLoader,
    IconProbe, IconResolver, IconRoute, IconSlot, IconStatus, IndexSnapshot, IndexSource,
    LoadEvent, LoadOutcome, ResolvedIcon,
};

pub use layout::{ItemSpec, TrackLayout, measure_track, string_width};

pub use marquee::{Marquee, ScrollLoop, ScrollMode, ScrollPhase, TechItem, wrap_offset};

pub use renderer::{DiffRenderer, FrameBuffer};

pub use state::{
    FrameSubscription, InputEvent, MouseEvent, PointerEvent, PointerTracker, poll_event,
    subscribe_to_frames,
};

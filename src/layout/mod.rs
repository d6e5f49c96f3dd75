//! Layout Module
//!
//! Measures one pass of the marquee track using
//! [Taffy](https://github.com/DioxusLabs/taffy) flexbox, with label widths
//! from `unicode-width`.
//!
//! # Example
//!
//! ```ignore
//! use skill_marquee::layout::{measure_track, ItemSpec};
//!
//! let pass = measure_track(&[ItemSpec::new("Rust", true)], 3)?;
//! assert_eq!(pass.width, 12.0);
//! ```

mod taffy_bridge;
mod text_measure;

pub use taffy_bridge::{ICON_GAP, ICON_WIDTH, ItemBox, ItemSpec, TrackLayout, measure_track};
pub use text_measure::{char_width, string_width};

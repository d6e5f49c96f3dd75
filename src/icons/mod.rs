//! Icons Module - Technology name to displayable icon
//!
//! - **index** - Curated index records and decoding
//! - **normalize** - Title normalization for matching
//! - **resolver** - Name → ordered candidate URLs
//! - **cache** - Fetch-once session cache for the index
//! - **slot** - Per-item candidate fallback
//! - **loader** - Async URL probing standing in for image loads

pub mod cache;
pub mod index;
pub mod loader;
pub mod normalize;
pub mod resolver;
pub mod slot;

pub use cache::{HttpIndexSource, IconIndexCache, IndexSnapshot, IndexSource};
pub use index::{IconIndex, IconIndexEntry, IconRoute};
pub use loader::{HttpIconProbe, IconLoader, IconProbe, LoadEvent, LoadOutcome};
pub use normalize::{normalize, titles_match};
pub use resolver::{IconResolver, ResolvedIcon};
pub use slot::{IconSlot, IconStatus, SlotChange};

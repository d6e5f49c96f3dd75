//! One technology on the track: its label and its icon slot.

use crate::icons::{IconResolver, IconSlot, IconStatus, IndexSnapshot, LoadEvent, LoadOutcome, SlotChange};
use crate::layout::ItemSpec;

/// Glyph for an icon whose current candidate loaded.
pub const GLYPH_LOADED: char = '●';

/// Glyph while the current candidate is still loading.
pub const GLYPH_PENDING: char = '○';

#[derive(Debug, Clone)]
pub struct TechItem {
    name: String,
    curated: bool,
    slot: IconSlot,
}

impl TechItem {
    /// Resolve `name` against the snapshot available right now.
    pub fn resolve(name: &str, resolver: &IconResolver, snapshot: &IndexSnapshot) -> Self {
        Self {
            name: name.to_string(),
            curated: resolver.is_curated(name),
            slot: IconSlot::new(resolver.resolve(name, snapshot)),
        }
    }

    /// Display name, also the label.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_curated(&self) -> bool {
        self.curated
    }

    pub fn slot(&self) -> &IconSlot {
        &self.slot
    }

    /// Layout input. The icon column stays reserved once the item has
    /// candidates, even after they all fail.
    pub fn spec(&self) -> ItemSpec {
        ItemSpec::new(self.name.as_str(), self.slot.has_candidates())
    }

    /// Glyph to paint in the icon column, if any.
    pub fn glyph(&self) -> Option<char> {
        match self.slot.status() {
            IconStatus::Loaded => Some(GLYPH_LOADED),
            IconStatus::Pending => Some(GLYPH_PENDING),
            IconStatus::Hidden => None,
        }
    }

    /// Re-resolve against a newer snapshot.
    ///
    /// Only curated items depend on the index. An unchanged result keeps the
    /// slot's progress. Returns true if the icon column appeared or vanished.
    pub fn refresh(&mut self, resolver: &IconResolver, snapshot: &IndexSnapshot) -> bool {
        if !self.curated {
            return false;
        }
        let icon = resolver.resolve(&self.name, snapshot);
        if &icon == self.slot.icon() {
            return false;
        }
        let had_column = self.slot.has_candidates();
        self.slot = IconSlot::new(icon);
        had_column != self.slot.has_candidates()
    }

    /// Apply a load outcome; ignored unless it is for the URL shown now.
    pub fn apply(&mut self, event: &LoadEvent) -> SlotChange {
        let change = match event.outcome {
            LoadOutcome::Loaded => self.slot.on_load(&event.url),
            LoadOutcome::Failed => self.slot.on_error(&event.url),
        };

        match &change {
            SlotChange::Advanced(index) => {
                tracing::debug!(item = %self.name, index, "icon candidate failed, trying next");
            }
            SlotChange::Exhausted => {
                tracing::warn!(item = %self.name, "no icon candidate loaded, showing label only");
            }
            SlotChange::Loaded | SlotChange::Ignored => {}
        }
        change
    }
}

//! Per-item icon fallback state.
//!
//! Each rendered item owns one [`IconSlot`]: its resolved candidates and a
//! cursor into them. A failed load advances the cursor; running past the end
//! hides the icon while the label stays. A successful load pins the current
//! candidate.

use super::resolver::ResolvedIcon;

/// Display state of an item's icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconStatus {
    /// Current candidate requested, outcome unknown.
    Pending,
    /// Current candidate loaded; no further fallback.
    Loaded,
    /// No candidate left (or none to begin with). Label only.
    Hidden,
}

/// What a load event did to a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotChange {
    /// The event was for a URL this slot is not showing.
    Ignored,
    /// The current candidate loaded.
    Loaded,
    /// Moved on to the candidate at this position.
    Advanced(usize),
    /// Ran out of candidates.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSlot {
    icon: ResolvedIcon,
    index: usize,
    status: IconStatus,
}

impl IconSlot {
    pub fn new(icon: ResolvedIcon) -> Self {
        let status = if icon.is_empty() {
            IconStatus::Hidden
        } else {
            IconStatus::Pending
        };
        Self {
            icon,
            index: 0,
            status,
        }
    }

    /// Slot with no candidates.
    pub fn hidden() -> Self {
        Self::new(ResolvedIcon::none())
    }

    pub fn status(&self) -> IconStatus {
        self.status
    }

    pub fn icon(&self) -> &ResolvedIcon {
        &self.icon
    }

    /// Position of the current candidate.
    pub fn index(&self) -> usize {
        self.index
    }

    /// URL currently shown, unless hidden.
    pub fn current(&self) -> Option<&str> {
        match self.status {
            IconStatus::Hidden => None,
            _ => self.icon.candidates().get(self.index).map(String::as_str),
        }
    }

    /// Whether the slot still occupies space in the row.
    pub fn has_candidates(&self) -> bool {
        !self.icon.is_empty()
    }

    /// Record a load failure for `url`.
    pub fn on_error(&mut self, url: &str) -> SlotChange {
        if self.status != IconStatus::Pending || self.current() != Some(url) {
            return SlotChange::Ignored;
        }
        if self.index + 1 < self.icon.len() {
            self.index += 1;
            SlotChange::Advanced(self.index)
        } else {
            self.status = IconStatus::Hidden;
            SlotChange::Exhausted
        }
    }

    /// Record a successful load for `url`.
    pub fn on_load(&mut self, url: &str) -> SlotChange {
        if self.status != IconStatus::Pending || self.current() != Some(url) {
            return SlotChange::Ignored;
        }
        self.status = IconStatus::Loaded;
        SlotChange::Loaded
    }
}

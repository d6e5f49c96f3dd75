//! Taffy Bridge - off-screen measurement of one pass of the track
//!
//! Lays out a single, unrepeated copy of the item list as a flex row and
//! reads back its total width `W` plus every item's position. The marquee
//! never lays out the repeated track: copy `k` of item `i` sits at
//! `offset + k * W + items[i].x`.
//!
//! Item structure:
//!
//! ```text
//! ┌─ item (row, margin-x, gap 1) ──────┐
//! │ [icon 1 cell]  [label, measured]   │
//! └────────────────────────────────────┘
//! ```

use taffy::{
    AvailableSpace, Dimension, Display, FlexDirection, FlexWrap, LengthPercentage,
    LengthPercentageAuto, NodeId, Rect, Size, Style, TaffyTree,
};

use super::text_measure::string_width;
use crate::error::Result;

/// Cells reserved for the icon glyph.
pub const ICON_WIDTH: f32 = 1.0;

/// Gap between icon and label.
pub const ICON_GAP: f32 = 1.0;

// =============================================================================
// TYPES
// =============================================================================

/// What the measurement needs to know about an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub label: String,
    /// Whether an icon column is reserved.
    pub has_icon: bool,
}

impl ItemSpec {
    pub fn new(label: impl Into<String>, has_icon: bool) -> Self {
        Self {
            label: label.into(),
            has_icon,
        }
    }
}

/// Position of one item within a pass, in cells from the pass start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBox {
    /// Left edge of the item, margin excluded.
    pub x: f32,
    pub width: f32,
    /// Left edge of the icon glyph, if reserved.
    pub icon_x: Option<f32>,
    pub label_x: f32,
}

/// Measured pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackLayout {
    /// Width of one full pass, margins included.
    pub width: f32,
    pub items: Vec<ItemBox>,
}

// =============================================================================
// STYLES
// =============================================================================

fn row_style() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Row,
        flex_wrap: FlexWrap::NoWrap,
        ..Default::default()
    }
}

fn item_style(margin: u16, has_icon: bool) -> Style {
    let margin = margin as f32;
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Row,
        flex_shrink: 0.0,
        margin: Rect {
            left: LengthPercentageAuto::Length(margin),
            right: LengthPercentageAuto::Length(margin),
            top: LengthPercentageAuto::Length(0.0),
            bottom: LengthPercentageAuto::Length(0.0),
        },
        gap: Size {
            width: LengthPercentage::Length(if has_icon { ICON_GAP } else { 0.0 }),
            height: LengthPercentage::Length(0.0),
        },
        ..Default::default()
    }
}

fn icon_style() -> Style {
    Style {
        flex_shrink: 0.0,
        size: Size {
            width: Dimension::Length(ICON_WIDTH),
            height: Dimension::Length(1.0),
        },
        ..Default::default()
    }
}

fn label_style() -> Style {
    Style {
        flex_shrink: 0.0,
        ..Default::default()
    }
}

// =============================================================================
// MEASUREMENT
// =============================================================================

/// Single-line label measure function.
fn measure_label(
    label: &str,
    known_dimensions: Size<Option<f32>>,
    _available_space: Size<AvailableSpace>,
) -> Size<f32> {
    Size {
        width: known_dimensions
            .width
            .unwrap_or(string_width(label) as f32),
        height: known_dimensions.height.unwrap_or(1.0),
    }
}

struct ItemNodes {
    item: NodeId,
    icon: Option<NodeId>,
    label: NodeId,
}

/// Measure one pass of `items` with `margin` blank cells on each side of
/// every item.
///
/// An empty list measures to width 0.
pub fn measure_track(items: &[ItemSpec], margin: u16) -> Result<TrackLayout> {
    if items.is_empty() {
        return Ok(TrackLayout::default());
    }

    // Label text is the node context for the measure function
    let mut tree: TaffyTree<String> = TaffyTree::new();
    let mut nodes = Vec::with_capacity(items.len());

    for spec in items {
        let icon = if spec.has_icon {
            Some(tree.new_leaf(icon_style())?)
        } else {
            None
        };
        let label = tree.new_leaf_with_context(label_style(), spec.label.clone())?;

        let children: Vec<NodeId> = icon.into_iter().chain(std::iter::once(label)).collect();
        let item = tree.new_with_children(item_style(margin, spec.has_icon), &children)?;
        nodes.push(ItemNodes { item, icon, label });
    }

    let item_ids: Vec<NodeId> = nodes.iter().map(|n| n.item).collect();
    let root = tree.new_with_children(row_style(), &item_ids)?;

    let available = Size {
        width: AvailableSpace::MaxContent,
        height: AvailableSpace::MaxContent,
    };
    tree.compute_layout_with_measure(
        root,
        available,
        |known_dimensions, available_space, _node_id, context: Option<&mut String>, _style| {
            match context {
                Some(label) => measure_label(label, known_dimensions, available_space),
                None => Size::ZERO,
            }
        },
    )?;

    let mut result = TrackLayout {
        width: tree.layout(root)?.size.width,
        items: Vec::with_capacity(nodes.len()),
    };

    for node in &nodes {
        let item = tree.layout(node.item)?;
        let x = item.location.x;
        let icon_x = match node.icon {
            Some(icon) => Some(x + tree.layout(icon)?.location.x),
            None => None,
        };
        let label_x = x + tree.layout(node.label)?.location.x;

        result.items.push(ItemBox {
            x,
            width: item.size.width,
            icon_x,
            label_x,
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_empty() {
        let layout = measure_track(&[], 3).unwrap();
        assert_eq!(layout.width, 0.0);
        assert!(layout.items.is_empty());
    }

    #[test]
    fn test_measure_label_only() {
        let layout = measure_track(&[ItemSpec::new("Git", false)], 2).unwrap();
        // 2 + 3 + 2
        assert_eq!(layout.width, 7.0);
        assert_eq!(layout.items[0].x, 2.0);
        assert_eq!(layout.items[0].width, 3.0);
        assert_eq!(layout.items[0].icon_x, None);
        assert_eq!(layout.items[0].label_x, 2.0);
    }

    #[test]
    fn test_measure_with_icons() {
        let items = [ItemSpec::new("Python", true), ItemSpec::new("C", true)];
        let layout = measure_track(&items, 3).unwrap();

        // Each item: 3 + (1 icon + 1 gap + label) + 3
        // Python: 3 + 8 + 3 = 14, C: 3 + 3 + 3 = 9
        assert_eq!(layout.width, 23.0);

        let python = layout.items[0];
        assert_eq!(python.x, 3.0);
        assert_eq!(python.icon_x, Some(3.0));
        assert_eq!(python.label_x, 5.0);
        assert_eq!(python.width, 8.0);

        let c = layout.items[1];
        assert_eq!(c.x, 17.0);
        assert_eq!(c.icon_x, Some(17.0));
        assert_eq!(c.label_x, 19.0);
    }

    #[test]
    fn test_measure_mixed() {
        let items = [ItemSpec::new("AWS", false), ItemSpec::new("Bash", true)];
        let layout = measure_track(&items, 0).unwrap();
        assert_eq!(layout.width, 3.0 + 6.0);
        assert_eq!(layout.items[1].icon_x, Some(3.0));
        assert_eq!(layout.items[1].label_x, 5.0);
    }
}

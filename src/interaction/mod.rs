//! Pointer-to-cell mapping over the coordinate table the painter leaves behind.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::PixelRect;

/// Pixel footprint of one rendered slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemRect {
    pub rect: PixelRect,
    /// The slot is empty; the rectangle is the cell footprint, not a cover.
    pub placeholder: bool,
}

/// Pointer position in client (on-screen, possibly CSS-scaled) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Logical surface position, floored to whole pixels.
    #[must_use]
    pub fn to_logical(self, scale_ratio: f64) -> (f64, f64) {
        if !scale_ratio.is_finite() || scale_ratio <= 0.0 {
            return (self.x.floor(), self.y.floor());
        }
        ((self.x / scale_ratio).floor(), (self.y / scale_ratio).floor())
    }
}

/// Slot index under the pointer plus whether that slot holds an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    pub index: usize,
    pub occupied: bool,
}

/// Per-index rectangles recorded by one paint pass, in reading order.
///
/// Replaced wholesale on every render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemCoordTable {
    entries: Vec<Option<ItemRect>>,
}

impl ItemCoordTable {
    #[must_use]
    pub fn with_slots(slot_count: usize) -> Self {
        Self {
            entries: vec![None; slot_count],
        }
    }

    pub fn record(&mut self, index: usize, rect: PixelRect, placeholder: bool) {
        if self.entries.len() <= index {
            self.entries.resize(index + 1, None);
        }
        self.entries[index] = Some(ItemRect { rect, placeholder });
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ItemRect> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ItemRect)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.as_ref().map(|rect| (index, rect)))
    }

    /// First slot whose inclusive rectangle contains the logical point.
    #[must_use]
    pub fn hit(&self, x: f64, y: f64) -> Option<usize> {
        self.iter()
            .find(|(_, entry)| entry.rect.contains(x, y))
            .map(|(index, _)| index)
    }
}

/// Maps a client-space pointer to the slot beneath it.
///
/// Returns `None` over gaps, the chart title band and the caption column.
#[must_use]
pub fn locate(pointer: PointerPosition, scale_ratio: f64, table: &ItemCoordTable) -> Option<usize> {
    let (x, y) = pointer.to_logical(scale_ratio);
    let hit = table.hit(x, y);
    if hit.is_none() {
        trace!(x, y, "pointer outside every slot");
    }
    hit
}

/// Like `locate`, also reporting whether the slot is filled.
#[must_use]
pub fn drop_target(
    pointer: PointerPosition,
    scale_ratio: f64,
    table: &ItemCoordTable,
) -> Option<DropTarget> {
    locate(pointer, scale_ratio, table).and_then(|index| {
        table.get(index).map(|entry| DropTarget {
            index,
            occupied: !entry.placeholder,
        })
    })
}

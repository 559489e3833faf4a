//! Lookup tables for the tiered layout.
//!
//! The breakpoints are product data, not a formula. Changing any entry moves
//! covers on every existing tiered chart.

use crate::core::chart::TieredSize;
use crate::core::types::CellCoords;

/// One contiguous index range sharing a cell size and sub-grid width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierSpec {
    pub first_index: usize,
    /// Inclusive; `None` for the open-ended last tier.
    pub last_index: Option<usize>,
    /// Sub-grid position is derived from `index - origin_index`.
    pub origin_index: usize,
    pub columns: usize,
    /// Multiplier applied to the base cell size.
    pub cell_scale: f64,
}

impl TierSpec {
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        index >= self.first_index && self.last_index.is_none_or(|last| index <= last)
    }

    #[must_use]
    pub fn cell_size(&self, base_cell_size: f64) -> f64 {
        base_cell_size * self.cell_scale
    }

    #[must_use]
    pub fn sub_grid_coords(&self, index: usize) -> CellCoords {
        let diff = index.saturating_sub(self.origin_index);
        CellCoords::new(diff % self.columns, diff / self.columns)
    }
}

/// Resolved tier of one index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierSlot {
    pub tier: usize,
    pub coords: CellCoords,
    pub cell_scale: f64,
    pub columns: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierTable {
    pub tiers: &'static [TierSpec],
    /// Indices at or past this are outside the layout.
    pub capacity: usize,
}

const LARGE_TIERS: [TierSpec; 4] = [
    TierSpec {
        first_index: 0,
        last_index: Some(10),
        origin_index: 0,
        columns: 5,
        cell_scale: 2.0,
    },
    TierSpec {
        first_index: 11,
        last_index: Some(28),
        origin_index: 10,
        columns: 6,
        cell_scale: 1.0,
    },
    TierSpec {
        first_index: 29,
        last_index: Some(58),
        origin_index: 28,
        columns: 10,
        cell_scale: 0.5,
    },
    TierSpec {
        first_index: 59,
        last_index: None,
        origin_index: 58,
        columns: 14,
        cell_scale: 0.25,
    },
];

const MEDIUM_TIERS: [TierSpec; 3] = [
    TierSpec {
        first_index: 0,
        last_index: Some(10),
        origin_index: 0,
        columns: 5,
        cell_scale: 2.0,
    },
    TierSpec {
        first_index: 11,
        last_index: Some(22),
        origin_index: 10,
        columns: 6,
        cell_scale: 1.0,
    },
    TierSpec {
        first_index: 23,
        last_index: None,
        origin_index: 22,
        columns: 10,
        cell_scale: 0.5,
    },
];

pub const LARGE_TIER_TABLE: TierTable = TierTable {
    tiers: &LARGE_TIERS,
    capacity: 100,
};

pub const MEDIUM_TIER_TABLE: TierTable = TierTable {
    tiers: &MEDIUM_TIERS,
    capacity: 42,
};

impl TierTable {
    #[must_use]
    pub fn for_size(size: TieredSize) -> Self {
        match size {
            TieredSize::Medium => MEDIUM_TIER_TABLE,
            TieredSize::Large => LARGE_TIER_TABLE,
        }
    }

    /// Tier and sub-grid coordinates of `index`, or `None` past capacity.
    ///
    /// Indices beyond the last threshold belong to the open-ended last tier.
    #[must_use]
    pub fn locate(&self, index: usize) -> Option<TierSlot> {
        if index >= self.capacity {
            return None;
        }
        self.tiers
            .iter()
            .enumerate()
            .find(|(_, spec)| spec.contains(index))
            .map(|(tier, spec)| TierSlot {
                tier,
                coords: spec.sub_grid_coords(index),
                cell_scale: spec.cell_scale,
                columns: spec.columns,
            })
    }

    /// Number of sub-grid rows tier `tier` needs when indices `0..slot_count` are laid out.
    #[must_use]
    pub fn rows_used(&self, tier: usize, slot_count: usize) -> usize {
        let Some(spec) = self.tiers.get(tier) else {
            return 0;
        };
        let last_in_scope = slot_count.min(self.capacity);
        if last_in_scope <= spec.first_index {
            return 0;
        }
        let mut last = last_in_scope - 1;
        if let Some(tier_last) = spec.last_index {
            last = last.min(tier_last);
        }
        spec.sub_grid_coords(last).row + 1
    }
}

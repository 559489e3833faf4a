use smallvec::SmallVec;

use crate::core::{Chart, LayoutMode, PixelRect, ScaledSize, TierTable};

/// Spacing inputs shared by both layout modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub cell_size: f64,
    pub gap: f64,
    pub chart_title_margin: f64,
    /// Height of the caption band under every row; zero unless captions sit below.
    pub caption_band_height: f64,
}

/// Row a slot belongs to, used to restart right-column captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowKey {
    pub tier: usize,
    pub row: usize,
}

/// Cell footprint of one in-scope slot, before centering its cover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotGeometry {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub cell_size: f64,
    pub row: RowKey,
    /// Width of the grid or sub-grid the slot sits in.
    pub row_columns: usize,
}

impl SlotGeometry {
    #[must_use]
    pub fn footprint(&self) -> PixelRect {
        PixelRect::from_origin(self.x, self.y, self.cell_size, self.cell_size)
    }

    /// Top-left corner that centers `scaled` inside the cell.
    #[must_use]
    pub fn centered_origin(&self, scaled: ScaledSize) -> (f64, f64) {
        (
            self.x + centering_offset(f64::from(scaled.width), self.cell_size),
            self.y + centering_offset(f64::from(scaled.height), self.cell_size),
        )
    }
}

/// Slot geometry for one render plus the extent of the cell area.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub slots: Vec<SlotGeometry>,
    /// Width of the cell area including outer gaps, excluding the caption column.
    pub content_width: f64,
    pub content_height: f64,
}

impl LayoutPlan {
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&SlotGeometry> {
        self.slots.get(index)
    }
}

/// Offset that centers `dimension` within `cell_size`; zero when it fills or overflows.
#[must_use]
pub fn centering_offset(dimension: f64, cell_size: f64) -> f64 {
    if dimension < cell_size {
        ((cell_size - dimension) / 2.0).floor()
    } else {
        0.0
    }
}

#[must_use]
pub fn plan_layout(chart: &Chart, metrics: LayoutMetrics) -> LayoutPlan {
    match chart.layout {
        LayoutMode::Grid => plan_grid(chart, metrics),
        LayoutMode::Tiered => plan_tiered(chart, metrics),
    }
}

fn plan_grid(chart: &Chart, metrics: LayoutMetrics) -> LayoutPlan {
    let LayoutMetrics {
        cell_size,
        gap,
        chart_title_margin,
        caption_band_height,
    } = metrics;
    let columns = chart.size.columns as usize;
    let rows = f64::from(chart.size.rows);
    let stride = cell_size + gap;

    let slots = (0..chart.size.capacity())
        .map(|index| {
            let coords = chart.size.coords_of(index);
            let row = coords.row as f64;
            SlotGeometry {
                index,
                x: coords.column as f64 * stride + gap,
                y: row * stride + gap + chart_title_margin + caption_band_height * row,
                cell_size,
                row: RowKey {
                    tier: 0,
                    row: coords.row,
                },
                row_columns: columns,
            }
        })
        .collect();

    LayoutPlan {
        slots,
        content_width: f64::from(chart.size.columns) * stride + gap,
        content_height: rows * stride + gap + chart_title_margin + rows * caption_band_height,
    }
}

#[derive(Debug, Clone, Copy)]
struct TierExtent {
    top: f64,
    cell_size: f64,
}

/// Tiers stack top to bottom; each takes as many sub-grid rows as its
/// in-scope indices need.
fn plan_tiered(chart: &Chart, metrics: LayoutMetrics) -> LayoutPlan {
    let LayoutMetrics {
        cell_size,
        gap,
        chart_title_margin,
        caption_band_height,
    } = metrics;
    let table = TierTable::for_size(chart.tiered_size);
    let slot_count = chart.size.capacity().min(table.capacity);

    let mut extents: SmallVec<[TierExtent; 4]> = SmallVec::new();
    let mut top = chart_title_margin + gap;
    let mut content_width = gap;
    for (tier, spec) in table.tiers.iter().enumerate() {
        let tier_cell = spec.cell_size(cell_size);
        let rows = table.rows_used(tier, slot_count);
        extents.push(TierExtent {
            top,
            cell_size: tier_cell,
        });
        if rows > 0 {
            content_width = content_width.max(spec.columns as f64 * (tier_cell + gap) + gap);
        }
        top += rows as f64 * (tier_cell + gap + caption_band_height);
    }

    let slots = (0..slot_count)
        .filter_map(|index| {
            let slot = table.locate(index)?;
            let extent = extents.get(slot.tier)?;
            let tier_cell = extent.cell_size;
            let row = slot.coords.row as f64;
            Some(SlotGeometry {
                index,
                x: slot.coords.column as f64 * (tier_cell + gap) + gap,
                y: extent.top + row * (tier_cell + gap + caption_band_height),
                cell_size: tier_cell,
                row: RowKey {
                    tier: slot.tier,
                    row: slot.coords.row,
                },
                row_columns: slot.columns,
            })
        })
        .collect();

    LayoutPlan {
        slots,
        content_width,
        content_height: top,
    }
}

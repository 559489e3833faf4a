use indexmap::IndexMap;
use tracing::trace;

use crate::core::constants::{
    CAPTION_BAND_PADDING, CAPTION_COLUMN_BUFFER, CHART_TITLE_MARGIN, FONT_SIZE_RATIO,
};
use crate::core::{Chart, ScaledSize, TitlePosition, Viewport, scaled_dimensions};
use crate::error::{ChartError, ChartResult};
use crate::render::{FontSpec, TextMeasurer};

use super::captions::{ItemCaption, build_captions, caption_max_length, truncate_caption};
use super::placement::{LayoutMetrics, LayoutPlan, plan_layout};
use super::CollageEngineConfig;

/// Everything the canvas size depends on, computed from a chart and a cell size.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDimensions {
    pub font_size_px: f64,
    pub chart_title_margin: f64,
    pub caption_band_height: f64,
    pub title_column_width: f64,
    /// Truncation bound for captions under a base-size cell.
    pub caption_max_length: usize,
    pub captions: IndexMap<usize, ItemCaption>,
    pub layout: LayoutPlan,
    /// Per in-scope slot; `None` for empty slots.
    pub scaled_dimensions: Vec<Option<ScaledSize>>,
    pub pixel_size: Viewport,
}

/// Caption font size: 16px at the default 260px cell, floored.
#[must_use]
pub fn font_size_for_cell(cell_size: u32) -> f64 {
    (f64::from(cell_size) / FONT_SIZE_RATIO).floor()
}

#[must_use]
pub fn chart_title_margin(chart: &Chart) -> f64 {
    if chart.has_title() {
        CHART_TITLE_MARGIN
    } else {
        0.0
    }
}

/// Height of the per-row caption band: two lines plus 15px above and below.
#[must_use]
pub fn caption_band_height(chart: &Chart, font_size_px: f64) -> f64 {
    if chart.show_titles && chart.title_position == TitlePosition::Below {
        font_size_px * 2.0 + CAPTION_BAND_PADDING
    } else {
        0.0
    }
}

/// Caption text as drawn in the right column.
#[must_use]
pub fn right_column_text(caption: &ItemCaption, max_length: usize, truncate: bool) -> String {
    if truncate {
        truncate_caption(&caption.text, max_length)
    } else {
        caption.text.clone()
    }
}

/// Width of the right caption column: widest caption + buffer + gap.
pub fn title_column_width(
    chart: &Chart,
    captions: &IndexMap<usize, ItemCaption>,
    font: &FontSpec,
    max_length: usize,
    truncate: bool,
    measurer: &impl TextMeasurer,
) -> ChartResult<f64> {
    let mut widest: f64 = 0.0;
    for caption in captions.values() {
        let text = right_column_text(caption, max_length, truncate);
        widest = widest.max(measurer.measure_text(&text, font)?);
    }
    Ok(widest + CAPTION_COLUMN_BUFFER + f64::from(chart.gap))
}

/// Resolves scaled covers, captions, gutters and the canvas pixel size.
pub fn resolve_dimensions(
    chart: &Chart,
    config: &CollageEngineConfig,
    measurer: &impl TextMeasurer,
) -> ChartResult<ResolvedDimensions> {
    chart.validate()?;
    config.validate()?;

    let cell_size = f64::from(config.cell_size);
    let gap = f64::from(chart.gap);
    let font_size_px = font_size_for_cell(config.cell_size);
    let chart_title_margin = chart_title_margin(chart);
    let caption_band_height = caption_band_height(chart, font_size_px);
    let caption_max_length = caption_max_length(cell_size, gap, font_size_px);

    let layout = plan_layout(
        chart,
        LayoutMetrics {
            cell_size,
            gap,
            chart_title_margin,
            caption_band_height,
        },
    );

    let captions = if chart.show_titles {
        build_captions(chart, layout.slot_count())
    } else {
        IndexMap::new()
    };

    let title_column_width = if chart.show_titles && chart.title_position == TitlePosition::Right
    {
        let font = FontSpec::new(chart.font_family(), font_size_px);
        title_column_width(
            chart,
            &captions,
            &font,
            caption_max_length,
            config.truncate_right_captions,
            measurer,
        )?
    } else {
        0.0
    };

    let scaled_dimensions = layout
        .slots
        .iter()
        .map(|slot| {
            chart
                .item(slot.index)
                .map(|item| scaled_dimensions(item.cover.natural_size(), slot.cell_size))
        })
        .collect();

    let width = (layout.content_width + title_column_width).floor();
    let height = layout.content_height.floor();
    if !width.is_finite() || !height.is_finite() || width > f64::from(u32::MAX) || height > f64::from(u32::MAX)
    {
        return Err(ChartError::InvalidData(format!(
            "canvas size out of range: {width}x{height}"
        )));
    }
    let pixel_size = Viewport::new(width as u32, height as u32);

    trace!(
        width = pixel_size.width,
        height = pixel_size.height,
        slots = layout.slot_count(),
        captions = captions.len(),
        "resolved chart dimensions"
    );

    Ok(ResolvedDimensions {
        font_size_px,
        chart_title_margin,
        caption_band_height,
        title_column_width,
        caption_max_length,
        captions,
        layout,
        scaled_dimensions,
        pixel_size,
    })
}

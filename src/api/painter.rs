use tracing::{debug, warn};

use crate::core::constants::{
    CAPTION_BAND_BASELINE_LIFT, CAPTION_COLUMN_INSET, CAPTION_DENSE_COLUMNS, CAPTION_LINE_SPACING,
    CAPTION_OUTLINE_WIDTH, CHART_TITLE_BASELINE_BASE, CHART_TITLE_FONT_SIZE,
    CHART_TITLE_OUTLINE_WIDTH, CREATOR_LINE_GAP,
};
use crate::core::{BackgroundKind, Chart, ImageRef, LoadState, PixelRect, TitlePosition};
use crate::error::ChartResult;
use crate::interaction::ItemCoordTable;
use crate::render::{
    Color, DrawCommand, FontSpec, FontWeight, ImagePrimitive, RectPrimitive, RenderFrame, Renderer,
    ShadowStyle, TextHAlign, TextOutline, TextPrimitive,
};

use super::canvas_info::CanvasInfo;
use super::captions::{caption_max_length, number_label, truncate_caption};
use super::dimension_resolver::right_column_text;
use super::placement::RowKey;
use super::CollageEngineConfig;

/// Draw commands of one pass plus the slot rectangles they occupy.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintedFrame {
    pub frame: RenderFrame,
    pub coords: ItemCoordTable,
}

/// Result of a full paint: the derived state and the hit-test table.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintOutput {
    pub canvas_info: CanvasInfo,
    pub coords: ItemCoordTable,
}

/// Builds canvas info (resizing the surface), paints the chart and submits
/// the frame to `renderer`.
pub fn paint<R: Renderer>(
    renderer: &mut R,
    chart: &Chart,
    config: &CollageEngineConfig,
) -> ChartResult<PaintOutput> {
    let canvas_info = CanvasInfo::build(renderer, chart, config)?;
    let painted = build_frame(chart, &canvas_info, config)?;
    renderer.render(&painted.frame)?;
    Ok(PaintOutput {
        canvas_info,
        coords: painted.coords,
    })
}

/// Emits the ordered draw commands for `chart`:
/// background, shadow, chart title, covers, captions.
pub fn build_frame(
    chart: &Chart,
    info: &CanvasInfo,
    config: &CollageEngineConfig,
) -> ChartResult<PaintedFrame> {
    let mut frame = RenderFrame::new(info.viewport());

    paint_background(&mut frame, chart, info);

    if chart.shadows {
        frame.push(DrawCommand::SetShadow(Some(ShadowStyle::default())));
    }

    if chart.has_title() {
        paint_chart_title(&mut frame, chart, info);
    }

    let coords = paint_covers(&mut frame, chart, info);

    if chart.show_titles {
        match chart.title_position {
            TitlePosition::Right => paint_captions_right(&mut frame, info, config),
            TitlePosition::Below => paint_captions_below(&mut frame, chart, info),
        }
    }

    frame.validate()?;
    Ok(PaintedFrame { frame, coords })
}

fn paint_background(frame: &mut RenderFrame, chart: &Chart, info: &CanvasInfo) {
    let width = f64::from(info.pixel_width);
    let height = f64::from(info.pixel_height);

    match chart.background.kind {
        BackgroundKind::Color => {
            let color = Color::parse_hex(&chart.background.value).unwrap_or(Color::BLACK);
            frame.push(DrawCommand::FillRect(RectPrimitive::new(
                0.0, 0.0, width, height, color,
            )));
        }
        BackgroundKind::Image => {
            let Some(image) = chart.background.image.as_ref() else {
                debug!(url = %chart.background.value, "background image handle missing");
                return;
            };
            match cover_placement(image, width, height) {
                Some(primitive) => frame.push(DrawCommand::Image(primitive)),
                None if image.source().load_state() == LoadState::Failed => {
                    warn!(url = image.key(), "background image failed to load, skipping");
                }
                None => debug!(url = image.key(), "background image not ready, skipping"),
            }
        }
    }
}

/// Scale-to-cover placement: the image spans one canvas axis fully and is
/// centered (and cropped) on the other.
#[must_use]
pub fn cover_placement(image: &ImageRef, width: f64, height: f64) -> Option<ImagePrimitive> {
    if !image.is_ready() {
        return None;
    }
    let (natural_width, natural_height) = image.natural_size();
    if natural_width == 0 || natural_height == 0 || width <= 0.0 || height <= 0.0 {
        return None;
    }

    let image_ratio = f64::from(natural_height) / f64::from(natural_width);
    let canvas_ratio = height / width;

    let primitive = if image_ratio > canvas_ratio {
        let scaled_height = width * image_ratio;
        ImagePrimitive::new(
            image.clone(),
            0.0,
            ((height - scaled_height) / 2.0).floor(),
            width,
            scaled_height,
        )
    } else {
        let scaled_width = width * canvas_ratio / image_ratio;
        ImagePrimitive::new(
            image.clone(),
            ((width - scaled_width) / 2.0).floor(),
            0.0,
            scaled_width,
            height,
        )
    };
    Some(primitive)
}

fn paint_chart_title(frame: &mut RenderFrame, chart: &Chart, info: &CanvasInfo) {
    let text = TextPrimitive::new(
        chart.title.clone(),
        f64::from(info.pixel_width) / 2.0,
        (info.gap + CHART_TITLE_BASELINE_BASE) / 2.0,
        FontSpec::new(info.font_family.clone(), CHART_TITLE_FONT_SIZE),
        info.text_color,
        TextHAlign::Center,
    )
    .with_outline(TextOutline {
        width: CHART_TITLE_OUTLINE_WIDTH,
        color: Color::BLACK,
        under_fill: false,
    });
    frame.push(DrawCommand::Text(text));
}

fn paint_covers(frame: &mut RenderFrame, chart: &Chart, info: &CanvasInfo) -> ItemCoordTable {
    let mut coords = ItemCoordTable::with_slots(info.slot_count());

    for slot in &info.layout.slots {
        let Some(item) = chart.item(slot.index) else {
            coords.record(slot.index, slot.footprint(), true);
            continue;
        };

        let scaled = info.scaled_dimensions_of(slot.index).unwrap_or_default();
        let (x, y) = slot.centered_origin(scaled);
        let width = f64::from(scaled.width);
        let height = f64::from(scaled.height);

        if scaled.width == 0 || scaled.height == 0 {
            debug!(
                index = slot.index,
                url = item.cover.key(),
                "cover has no natural size yet, nothing drawn"
            );
        } else {
            frame.push(DrawCommand::Image(ImagePrimitive::new(
                item.cover.clone(),
                x,
                y,
                width,
                height,
            )));
        }
        coords.record(slot.index, PixelRect::from_origin(x, y, width, height), false);
    }

    coords
}

fn caption_outline() -> TextOutline {
    TextOutline {
        width: CAPTION_OUTLINE_WIDTH,
        color: Color::BLACK,
        under_fill: true,
    }
}

/// Right-column captions: one line per filled slot, walking down each row
/// and restarting at the top of the next row.
///
/// From `CAPTION_DENSE_COLUMNS` columns on, lines are spaced
/// `floor(cell / columns)` apart and can overlap on wide grids.
fn paint_captions_right(frame: &mut RenderFrame, info: &CanvasInfo, config: &CollageEngineConfig) {
    let font = FontSpec::new(info.font_family.clone(), info.font_size_px);
    let x = info.layout.content_width + CAPTION_COLUMN_INSET - (info.gap / 2.0).floor();

    let mut current_row: Option<RowKey> = None;
    let mut baseline = 0.0;

    for slot in &info.layout.slots {
        if current_row == Some(slot.row) {
            baseline += if slot.row_columns < CAPTION_DENSE_COLUMNS {
                info.font_size_px * CAPTION_LINE_SPACING
            } else {
                (slot.cell_size / slot.row_columns as f64).floor()
            };
        } else {
            current_row = Some(slot.row);
            baseline = slot.y + info.font_size_px;
        }

        let Some(caption) = info.captions.get(&slot.index) else {
            continue;
        };
        let text = right_column_text(
            caption,
            info.caption_max_length,
            config.truncate_right_captions,
        );
        if text.is_empty() {
            continue;
        }

        frame.push(DrawCommand::Text(
            TextPrimitive::new(
                text,
                x,
                baseline,
                font.clone(),
                info.text_color,
                TextHAlign::Left,
            )
            .with_outline(caption_outline()),
        ));
    }
}

/// Below-row captions: a bold title line centered under the cell and an
/// optional lighter creator line beneath it.
fn paint_captions_below(frame: &mut RenderFrame, chart: &Chart, info: &CanvasInfo) {
    let title_font =
        FontSpec::new(info.font_family.clone(), info.font_size_px).with_weight(FontWeight::Bold);
    let creator_font =
        FontSpec::new(info.font_family.clone(), info.font_size_px).with_weight(FontWeight::Light);

    for slot in &info.layout.slots {
        let Some(item) = chart.item(slot.index) else {
            continue;
        };
        let max_length = caption_max_length(slot.cell_size, info.gap, info.font_size_px);
        let x = slot.x + slot.cell_size / 2.0;
        let y = slot.y + slot.cell_size + info.caption_band_height / 2.0
            - CAPTION_BAND_BASELINE_LIFT;

        let title = match (chart.show_numbers, info.captions.get(&slot.index)) {
            (true, Some(caption)) => number_label(caption.rank, &item.title),
            _ => item.title.clone(),
        };
        let title = truncate_caption(&title, max_length);
        if !title.is_empty() {
            frame.push(DrawCommand::Text(
                TextPrimitive::new(
                    title,
                    x,
                    y,
                    title_font.clone(),
                    info.text_color,
                    TextHAlign::Center,
                )
                .with_outline(caption_outline()),
            ));
        }

        if let Some(creator) = item.creator() {
            frame.push(DrawCommand::Text(
                TextPrimitive::new(
                    truncate_caption(creator, max_length),
                    x,
                    y + CREATOR_LINE_GAP + info.font_size_px,
                    creator_font.clone(),
                    info.text_color,
                    TextHAlign::Center,
                )
                .with_outline(caption_outline()),
            ));
        }
    }
}

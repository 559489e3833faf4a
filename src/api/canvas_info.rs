use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants::DEFAULT_TEXT_RGB;
use crate::core::{Chart, ClientSize, ScaledSize, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, Renderer};

use super::captions::ItemCaption;
use super::dimension_resolver::resolve_dimensions;
use super::placement::LayoutPlan;
use super::CollageEngineConfig;

/// Derived state of one render pass.
///
/// Built fresh from a `Chart` at the start of every render and never mutated
/// afterwards; the painter and hit tester only read it.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasInfo {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub cell_size: f64,
    pub gap: f64,
    /// Space reserved above the grid for the chart title.
    pub chart_title_margin: f64,
    pub title_column_width: f64,
    pub font_size_px: f64,
    pub caption_band_height: f64,
    pub caption_max_length: usize,
    pub font_family: String,
    pub text_color: Color,
    pub layout: LayoutPlan,
    pub scaled_dimensions: Vec<Option<ScaledSize>>,
    pub captions: IndexMap<usize, ItemCaption>,
}

/// Canvas metrics expressed in on-screen (client) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledCanvasInfo {
    /// `client_height / logical_height`.
    pub scale_ratio: f64,
    pub scaled_gap: f64,
    pub scaled_title_height: f64,
    pub scaled_cell_size: f64,
    pub scaled_caption_height: f64,
    pub scaled_width: f64,
    pub scaled_height: f64,
}

/// `#RRGGBB` text colors are honored; anything else renders white.
#[must_use]
pub fn resolve_text_color(chart: &Chart) -> Color {
    chart
        .text_color
        .as_deref()
        .and_then(Color::parse_hex6)
        .unwrap_or_else(|| {
            let (red, green, blue) = DEFAULT_TEXT_RGB;
            Color::from_rgb8(red, green, blue)
        })
}

impl CanvasInfo {
    /// Resolves dimensions and resizes the renderer's surface to match.
    ///
    /// The resize happens here, before any draw call, because it clears the surface.
    pub fn build<R: Renderer>(
        renderer: &mut R,
        chart: &Chart,
        config: &CollageEngineConfig,
    ) -> ChartResult<Self> {
        let resolved = resolve_dimensions(chart, config, &*renderer)?;
        renderer.resize(resolved.pixel_size)?;

        debug!(
            width = resolved.pixel_size.width,
            height = resolved.pixel_size.height,
            cell_size = config.cell_size,
            font_size = resolved.font_size_px,
            "canvas info built"
        );

        Ok(Self {
            pixel_width: resolved.pixel_size.width,
            pixel_height: resolved.pixel_size.height,
            cell_size: f64::from(config.cell_size),
            gap: f64::from(chart.gap),
            chart_title_margin: resolved.chart_title_margin,
            title_column_width: resolved.title_column_width,
            font_size_px: resolved.font_size_px,
            caption_band_height: resolved.caption_band_height,
            caption_max_length: resolved.caption_max_length,
            font_family: chart.font_family().to_owned(),
            text_color: resolve_text_color(chart),
            layout: resolved.layout,
            scaled_dimensions: resolved.scaled_dimensions,
            captions: resolved.captions,
        })
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.pixel_width, self.pixel_height)
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.layout.slot_count()
    }

    #[must_use]
    pub fn scaled_dimensions_of(&self, index: usize) -> Option<ScaledSize> {
        self.scaled_dimensions.get(index).copied().flatten()
    }

    /// Ratio of on-screen to logical size; `1.0` for an unscaled surface.
    pub fn scale_ratio(&self, client: Option<ClientSize>) -> ChartResult<f64> {
        if self.pixel_height == 0 {
            return Err(ChartError::InvalidViewport {
                width: self.pixel_width,
                height: self.pixel_height,
            });
        }
        let Some(client) = client else {
            return Ok(1.0);
        };
        if !client.height.is_finite() || client.height <= 0.0 {
            return Err(ChartError::InvalidData(
                "client height must be finite and > 0".to_owned(),
            ));
        }
        Ok(client.height / f64::from(self.pixel_height))
    }

    /// Client-space versions of the layout metrics, for pointer math on a scaled surface.
    pub fn scaled_info(&self, client: Option<ClientSize>) -> ChartResult<ScaledCanvasInfo> {
        let scale_ratio = self.scale_ratio(client)?;
        Ok(ScaledCanvasInfo {
            scale_ratio,
            scaled_gap: self.gap * scale_ratio,
            scaled_title_height: self.chart_title_margin * scale_ratio,
            scaled_cell_size: self.cell_size * scale_ratio,
            scaled_caption_height: self.caption_band_height * scale_ratio,
            scaled_width: f64::from(self.pixel_width) * scale_ratio,
            scaled_height: f64::from(self.pixel_height) * scale_ratio,
        })
    }
}

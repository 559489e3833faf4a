mod canvas_info;
mod captions;
mod dimension_resolver;
mod engine_config;
mod painter;
mod placement;

pub use canvas_info::{CanvasInfo, ScaledCanvasInfo, resolve_text_color};
pub use captions::{
    ItemCaption, build_captions, caption_max_length, number_label, truncate_caption,
};
pub use dimension_resolver::{
    ResolvedDimensions, caption_band_height, chart_title_margin, font_size_for_cell,
    resolve_dimensions, title_column_width,
};
pub use engine_config::CollageEngineConfig;
pub use painter::{PaintOutput, PaintedFrame, build_frame, cover_placement, paint};
pub use placement::{
    LayoutMetrics, LayoutPlan, RowKey, SlotGeometry, centering_offset, plan_layout,
};

use tracing::debug;

use crate::core::Chart;
use crate::error::ChartResult;
use crate::interaction::{self, DropTarget, ItemCoordTable, PointerPosition};
use crate::render::{RenderFrame, Renderer};

/// State retained from the most recent render, read by hit testing.
#[derive(Debug, Clone, PartialEq)]
struct RenderPass {
    canvas_info: CanvasInfo,
    coords: ItemCoordTable,
}

/// Runs render passes against one backend and keeps the last pass for hit testing.
pub struct CollageEngine<R: Renderer> {
    renderer: R,
    config: CollageEngineConfig,
    last_pass: Option<RenderPass>,
}

impl<R: Renderer> CollageEngine<R> {
    pub fn new(renderer: R, config: CollageEngineConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            renderer,
            config,
            last_pass: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> CollageEngineConfig {
        self.config
    }

    /// Takes effect on the next render.
    pub fn set_config(&mut self, config: CollageEngineConfig) -> ChartResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Full pass: size the surface, paint, submit the frame, replace the coordinate table.
    ///
    /// A failed pass leaves no coordinate table behind, since the surface may
    /// already have been resized and cleared.
    pub fn render(&mut self, chart: &Chart) -> ChartResult<&CanvasInfo> {
        self.last_pass = None;
        let output = paint(&mut self.renderer, chart, &self.config)?;
        debug!(
            width = output.canvas_info.pixel_width,
            height = output.canvas_info.pixel_height,
            slots = output.coords.len(),
            "chart rendered"
        );
        let pass = self.last_pass.insert(RenderPass {
            canvas_info: output.canvas_info,
            coords: output.coords,
        });
        Ok(&pass.canvas_info)
    }

    /// Same as `render` but returns the frame instead of submitting it.
    ///
    /// The surface is still resized, so this clears whatever the backend held.
    pub fn build_render_frame(&mut self, chart: &Chart) -> ChartResult<RenderFrame> {
        self.last_pass = None;
        let canvas_info = CanvasInfo::build(&mut self.renderer, chart, &self.config)?;
        let painted = build_frame(chart, &canvas_info, &self.config)?;
        self.last_pass = Some(RenderPass {
            canvas_info,
            coords: painted.coords,
        });
        Ok(painted.frame)
    }

    #[must_use]
    pub fn canvas_info(&self) -> Option<&CanvasInfo> {
        self.last_pass.as_ref().map(|pass| &pass.canvas_info)
    }

    #[must_use]
    pub fn item_coords(&self) -> Option<&ItemCoordTable> {
        self.last_pass.as_ref().map(|pass| &pass.coords)
    }

    /// Client-space metrics of the last render; `None` before the first one.
    pub fn scaled_info(&self) -> ChartResult<Option<ScaledCanvasInfo>> {
        self.last_pass
            .as_ref()
            .map(|pass| pass.canvas_info.scaled_info(self.renderer.client_size()))
            .transpose()
    }

    /// Slot under a client-space pointer, if any.
    #[must_use]
    pub fn locate(&self, pointer: PointerPosition) -> Option<usize> {
        let pass = self.last_pass.as_ref()?;
        let scale_ratio = pass
            .canvas_info
            .scale_ratio(self.renderer.client_size())
            .ok()?;
        interaction::locate(pointer, scale_ratio, &pass.coords)
    }

    #[must_use]
    pub fn drop_target(&self, pointer: PointerPosition) -> Option<DropTarget> {
        let pass = self.last_pass.as_ref()?;
        let scale_ratio = pass
            .canvas_info
            .scale_ratio(self.renderer.client_size())
            .ok()?;
        interaction::drop_target(pointer, scale_ratio, &pass.coords)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

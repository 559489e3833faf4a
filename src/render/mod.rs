mod frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::{MONOSPACE_ADVANCE_RATIO, NullRenderer};
pub use primitives::{
    Color, DrawCommand, FontSpec, FontWeight, ImagePrimitive, RectPrimitive, ShadowStyle,
    TextHAlign, TextOutline, TextPrimitive,
};

use crate::core::{ClientSize, Viewport};
use crate::error::ChartResult;

/// Text metrics provider used while sizing the caption column.
pub trait TextMeasurer {
    /// Advance width of `text` in pixels.
    fn measure_text(&self, text: &str, font: &FontSpec) -> ChartResult<f64>;
}

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from chart layout and hit testing.
pub trait Renderer: TextMeasurer {
    /// Sets the physical pixel size. Clears the surface.
    fn resize(&mut self, viewport: Viewport) -> ChartResult<()>;

    fn viewport(&self) -> Viewport;

    /// On-screen size when the host scales the surface; `None` when unscaled.
    fn client_size(&self) -> Option<ClientSize> {
        None
    }

    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderStats, CairoRenderer};

use crate::core::{ClientSize, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{FontSpec, RenderFrame, Renderer, TextMeasurer};

/// Advance of one glyph as a fraction of the font size in `NullRenderer` metrics.
pub const MONOSPACE_ADVANCE_RATIO: f64 = 0.6;

/// Headless renderer used by tests and layout-only hosts.
///
/// It validates frames and keeps the last one so callers can inspect what a
/// real backend would have drawn. Text metrics assume a fixed-advance font.
#[derive(Debug, Clone, Default)]
pub struct NullRenderer {
    viewport: Option<Viewport>,
    client_size: Option<ClientSize>,
    unavailable: bool,
    pub resize_count: usize,
    pub last_frame: Option<RenderFrame>,
}

impl NullRenderer {
    /// Renderer that reports an on-screen size distinct from its logical size.
    #[must_use]
    pub fn with_client_size(mut self, client_size: ClientSize) -> Self {
        self.client_size = Some(client_size);
        self
    }

    /// Renderer whose drawing context can never be created.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Makes later calls fail as if the drawing context had been lost.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    pub fn set_client_size(&mut self, client_size: Option<ClientSize>) {
        self.client_size = client_size;
    }

    fn ensure_available(&self) -> ChartResult<()> {
        if self.unavailable {
            return Err(ChartError::SurfaceUnavailable(
                "null renderer configured without a drawing context".to_owned(),
            ));
        }
        Ok(())
    }
}

impl TextMeasurer for NullRenderer {
    fn measure_text(&self, text: &str, font: &FontSpec) -> ChartResult<f64> {
        self.ensure_available()?;
        Ok(text.chars().count() as f64 * font.size_px * MONOSPACE_ADVANCE_RATIO)
    }
}

impl Renderer for NullRenderer {
    fn resize(&mut self, viewport: Viewport) -> ChartResult<()> {
        self.ensure_available()?;
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.viewport = Some(viewport);
        self.resize_count += 1;
        self.last_frame = None;
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        self.viewport.unwrap_or(Viewport::new(0, 0))
    }

    fn client_size(&self) -> Option<ClientSize> {
        self.client_size
    }

    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        self.ensure_available()?;
        frame.validate()?;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}

use std::io::Write;

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use tracing::debug;

use crate::core::{ClientSize, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, DrawCommand, FontSpec, FontWeight, ImagePrimitive, RectPrimitive, RenderFrame,
    Renderer, ShadowStyle, TextHAlign, TextMeasurer, TextPrimitive,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub rects_drawn: usize,
    pub images_drawn: usize,
    /// Images without decoded pixels; nothing is drawn for them.
    pub images_skipped: usize,
    pub texts_drawn: usize,
}

/// Cairo + Pango + PangoCairo raster backend.
///
/// Draws into an opaque ARGB32 image surface that can be exported as PNG.
/// Blur is not reproduced: a shadow is an offset, translucent copy of the
/// shape beneath it.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    client_size: Option<ClientSize>,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(viewport: Viewport) -> ChartResult<Self> {
        Ok(Self {
            surface: create_surface(viewport)?,
            clear_color: Color::BLACK,
            client_size: None,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    /// Declares the on-screen size the host scales this surface to.
    pub fn set_client_size(&mut self, client_size: Option<ClientSize>) {
        self.client_size = client_size;
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    pub fn write_png<W: Write>(&self, writer: &mut W) -> ChartResult<()> {
        self.surface
            .write_to_png(writer)
            .map_err(|err| ChartError::InvalidData(format!("failed to encode png: {err}")))
    }

    pub fn to_png_bytes(&self) -> ChartResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_png(&mut buffer)?;
        Ok(buffer)
    }

    fn context(&self) -> ChartResult<Context> {
        Context::new(&self.surface)
            .map_err(|err| surface_unavailable("failed to create cairo context", err))
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.clear_color.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();
        let mut shadow: Option<ShadowStyle> = None;

        for command in &frame.commands {
            match command {
                DrawCommand::SetShadow(style) => shadow = *style,
                DrawCommand::FillRect(rect) => {
                    fill_rect(context, *rect, shadow)?;
                    stats.rects_drawn += 1;
                }
                DrawCommand::Image(image) => {
                    if draw_image(context, image, shadow)? {
                        stats.images_drawn += 1;
                    } else {
                        stats.images_skipped += 1;
                    }
                }
                DrawCommand::Text(text) => {
                    draw_text(context, text, shadow)?;
                    stats.texts_drawn += 1;
                }
            }
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl TextMeasurer for CairoRenderer {
    fn measure_text(&self, text: &str, font: &FontSpec) -> ChartResult<f64> {
        let context = self.context()?;
        let layout = create_text_layout(&context, text, font);
        let (width, _height) = layout.size();
        Ok(f64::from(width) / f64::from(pango::SCALE))
    }
}

impl Renderer for CairoRenderer {
    fn resize(&mut self, viewport: Viewport) -> ChartResult<()> {
        self.surface = create_surface(viewport)?;
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(
            u32::try_from(self.surface.width()).unwrap_or(0),
            u32::try_from(self.surface.height()).unwrap_or(0),
        )
    }

    fn client_size(&self) -> Option<ClientSize> {
        self.client_size
    }

    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context = self.context()?;
        self.render_with_context(&context, frame)
    }
}

fn create_surface(viewport: Viewport) -> ChartResult<ImageSurface> {
    if !viewport.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    let width = to_i32(viewport.width, "surface width")?;
    let height = to_i32(viewport.height, "surface height")?;
    ImageSurface::create(Format::ARgb32, width, height)
        .map_err(|err| surface_unavailable("failed to create cairo surface", err))
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn fill_rect(context: &Context, rect: RectPrimitive, shadow: Option<ShadowStyle>) -> ChartResult<()> {
    if let Some(shadow) = shadow {
        context.rectangle(
            rect.x + shadow.offset_x,
            rect.y + shadow.offset_y,
            rect.width,
            rect.height,
        );
        apply_color(context, shadow.color);
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill rectangle shadow", err))?;
    }
    context.rectangle(rect.x, rect.y, rect.width, rect.height);
    apply_color(context, rect.fill_color);
    context
        .fill()
        .map_err(|err| map_backend_error("failed to fill rectangle", err))
}

/// Returns `false` when the image has no pixels to draw.
fn draw_image(
    context: &Context,
    image: &ImagePrimitive,
    shadow: Option<ShadowStyle>,
) -> ChartResult<bool> {
    let (natural_width, natural_height) = image.image.natural_size();
    let Some(pixels) = image.image.source().rgba_pixels() else {
        debug!(url = image.image.key(), "image has no decoded pixels, skipping");
        return Ok(false);
    };
    if natural_width == 0 || natural_height == 0 {
        return Ok(false);
    }
    let source = image_surface_from_rgba(natural_width, natural_height, pixels)?;

    if let Some(shadow) = shadow {
        context.new_path();
        context.rectangle(
            image.x + shadow.offset_x,
            image.y + shadow.offset_y,
            image.width,
            image.height,
        );
        apply_color(context, shadow.color);
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill image shadow", err))?;
    }

    context
        .save()
        .map_err(|err| map_backend_error("failed to save cairo state", err))?;
    context.translate(image.x, image.y);
    context.scale(
        image.width / f64::from(natural_width),
        image.height / f64::from(natural_height),
    );
    context
        .set_source_surface(&source, 0.0, 0.0)
        .map_err(|err| map_backend_error("failed to set image source", err))?;
    context
        .paint()
        .map_err(|err| map_backend_error("failed to paint image", err))?;
    context
        .restore()
        .map_err(|err| map_backend_error("failed to restore cairo state", err))?;
    Ok(true)
}

fn create_text_layout(context: &Context, text: &str, font: &FontSpec) -> pango::Layout {
    let layout = pangocairo::functions::create_layout(context);
    let mut description = FontDescription::new();
    description.set_family(&font.family);
    description.set_absolute_size(font.size_px * f64::from(pango::SCALE));
    description.set_weight(match font.weight {
        FontWeight::Normal => pango::Weight::Normal,
        FontWeight::Bold => pango::Weight::Bold,
        FontWeight::Light => pango::Weight::Light,
    });
    layout.set_font_description(Some(&description));
    layout.set_text(text);
    layout
}

fn draw_text(context: &Context, text: &TextPrimitive, shadow: Option<ShadowStyle>) -> ChartResult<()> {
    let layout = create_text_layout(context, &text.text, &text.font);
    let (width_units, _height_units) = layout.size();
    let width = f64::from(width_units) / f64::from(pango::SCALE);
    let baseline = f64::from(layout.baseline()) / f64::from(pango::SCALE);

    let x = match text.h_align {
        TextHAlign::Left => text.x,
        TextHAlign::Center => text.x - width / 2.0,
    };
    let top = text.y - baseline;

    if let Some(shadow) = shadow {
        context.new_path();
        apply_color(context, shadow.color);
        context.move_to(x + shadow.offset_x, top + shadow.offset_y);
        pangocairo::functions::show_layout(context, &layout);
    }

    let fill = || {
        context.new_path();
        apply_color(context, text.color);
        context.move_to(x, top);
        pangocairo::functions::show_layout(context, &layout);
    };

    match text.outline {
        None => fill(),
        Some(outline) => {
            let stroke = || -> ChartResult<()> {
                context.new_path();
                context.move_to(x, top);
                pangocairo::functions::layout_path(context, &layout);
                apply_color(context, outline.color);
                context.set_line_width(outline.width);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke text outline", err))
            };
            if outline.under_fill {
                stroke()?;
                fill();
            } else {
                fill();
                stroke()?;
            }
        }
    }
    Ok(())
}

/// Uploads straight-alpha RGBA rows into a premultiplied ARGB32 surface.
fn image_surface_from_rgba(width: u32, height: u32, rgba: &[u8]) -> ChartResult<ImageSurface> {
    let row_bytes = width as usize * 4;
    if rgba.len() < row_bytes * height as usize {
        return Err(ChartError::InvalidData(
            "image pixel buffer shorter than its natural size".to_owned(),
        ));
    }

    let stride = Format::ARgb32
        .stride_for_width(width)
        .map_err(|err| map_backend_error("failed to compute image stride", err))?;
    let stride_bytes = usize::try_from(stride)
        .map_err(|_| ChartError::InvalidData("negative image stride".to_owned()))?;

    let mut data = vec![0_u8; stride_bytes * height as usize];
    for (row_index, row) in rgba.chunks_exact(row_bytes).take(height as usize).enumerate() {
        let start = row_index * stride_bytes;
        let target = &mut data[start..start + row_bytes];
        for (source, pixel) in row.chunks_exact(4).zip(target.chunks_exact_mut(4)) {
            let alpha = u32::from(source[3]);
            let premultiply = |channel: u8| (u32::from(channel) * alpha + 127) / 255;
            let argb = (alpha << 24)
                | (premultiply(source[0]) << 16)
                | (premultiply(source[1]) << 8)
                | premultiply(source[2]);
            pixel.copy_from_slice(&argb.to_ne_bytes());
        }
    }

    ImageSurface::create_for_data(
        data,
        Format::ARgb32,
        to_i32(width, "image width")?,
        to_i32(height, "image height")?,
        stride,
    )
    .map_err(|err| map_backend_error("failed to create image surface", err))
}

fn to_i32(value: u32, what: &str) -> ChartResult<i32> {
    i32::try_from(value).map_err(|_| ChartError::InvalidData(format!("{what} exceeds i32: {value}")))
}

fn surface_unavailable(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::SurfaceUnavailable(format!("{prefix}: {err}"))
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}

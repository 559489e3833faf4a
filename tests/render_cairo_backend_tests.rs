#![cfg(feature = "cairo-backend")]

use std::sync::Arc;

use cairo::{Context, Format, ImageSurface};
use collage_rs::ChartError;
use collage_rs::api::{CollageEngine, CollageEngineConfig};
use collage_rs::core::{
    Background, Chart, GridSize, ImageMetadata, ImageRef, ItemSlot, RasterImage, TitlePosition,
    Viewport,
};
use collage_rs::render::{CairoRenderer, Renderer};

fn solid_item(title: &str, width: u32, height: u32) -> ItemSlot {
    let image = RasterImage::solid(width, height, [200, 40, 40, 255]);
    ItemSlot::new(title, ImageRef::new(format!("{title}.png"), Arc::new(image)))
}

fn pixel_at(renderer: &CairoRenderer, x: usize, y: usize) -> u32 {
    let source = renderer.surface();
    let mut copy =
        ImageSurface::create(Format::ARgb32, source.width(), source.height()).expect("copy");
    {
        let context = Context::new(&copy).expect("context");
        context.set_source_surface(source, 0.0, 0.0).expect("source");
        context.paint().expect("paint");
    }
    copy.flush();
    let stride = usize::try_from(copy.stride()).expect("stride");
    let data = copy.data().expect("surface data");
    let offset = y * stride + x * 4;
    u32::from_ne_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

#[test]
fn cairo_renderer_rejects_empty_surface() {
    let err = CairoRenderer::new(Viewport::new(0, 480)).expect_err("zero width must fail");
    assert!(matches!(err, ChartError::InvalidViewport { .. }));
}

#[test]
fn cairo_renderer_resizes_to_canvas_info() {
    let renderer = CairoRenderer::new(Viewport::new(1, 1)).expect("renderer");
    let mut engine =
        CollageEngine::new(renderer, CollageEngineConfig::default()).expect("engine init");
    engine
        .render(&Chart::new(GridSize::new(3, 3)).with_title("X"))
        .expect("render");
    assert_eq!(engine.renderer().viewport(), Viewport::new(820, 880));
}

#[test]
fn cairo_renderer_draws_covers_and_captions() {
    let chart = Chart::new(GridSize::new(2, 2))
        .with_title("Collage")
        .with_item_at(0, solid_item("A", 300, 300).with_creator("X"))
        .with_item_at(3, solid_item("D", 100, 50))
        .with_item_at(
            1,
            ItemSlot::new(
                "Unloaded",
                ImageRef::new("meta.png", Arc::new(ImageMetadata::ready(10, 10))),
            ),
        )
        .with_titles(TitlePosition::Below)
        .with_shadows(true);
    let renderer = CairoRenderer::new(Viewport::new(1, 1)).expect("renderer");
    let mut engine =
        CollageEngine::new(renderer, CollageEngineConfig::default()).expect("engine init");
    engine.render(&chart).expect("render");

    let stats = engine.renderer().last_stats();
    assert_eq!(stats.rects_drawn, 1);
    assert_eq!(stats.images_drawn, 2);
    assert_eq!(stats.images_skipped, 1);
    // Chart title, two lines for A, one each for D and the unloaded item.
    assert_eq!(stats.texts_drawn, 5);
}

#[test]
fn cairo_renderer_paints_background_and_cover_pixels() {
    let chart = Chart::new(GridSize::new(1, 1))
        .with_background(Background::color("#00ff00"))
        .with_item_at(0, solid_item("Red", 260, 260));
    let renderer = CairoRenderer::new(Viewport::new(1, 1)).expect("renderer");
    let mut engine =
        CollageEngine::new(renderer, CollageEngineConfig::default()).expect("engine init");
    engine.render(&chart).expect("render");
    let renderer = engine.into_renderer();

    assert_eq!(pixel_at(&renderer, 2, 2), 0xff00_ff00);
    assert_eq!(pixel_at(&renderer, 140, 140), 0xffc8_2828);
}

#[test]
fn cairo_renderer_exports_png() {
    let renderer = CairoRenderer::new(Viewport::new(1, 1)).expect("renderer");
    let mut engine =
        CollageEngine::new(renderer, CollageEngineConfig::default()).expect("engine init");
    engine
        .render(&Chart::new(GridSize::new(1, 1)))
        .expect("render");
    let png = engine.renderer().to_png_bytes().expect("png bytes");
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

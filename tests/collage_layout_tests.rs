use std::sync::Arc;

use approx::assert_abs_diff_eq;
use collage_rs::ChartError;
use collage_rs::api::{CollageEngine, CollageEngineConfig};
use collage_rs::core::{
    Background, Chart, GridSize, ImageMetadata, ImageRef, ItemSlot, LayoutMode, ScaledSize,
    TieredSize, TitlePosition, Viewport,
};
use collage_rs::render::{
    Color, DrawCommand, FontSpec, NullRenderer, Renderer, ShadowStyle, TextMeasurer,
};

fn cover(url: &str, width: u32, height: u32) -> ImageRef {
    ImageRef::new(url, Arc::new(ImageMetadata::ready(width, height)))
}

fn item(title: &str, width: u32, height: u32) -> ItemSlot {
    ItemSlot::new(title, cover(&format!("{title}.jpg"), width, height))
}

fn engine() -> CollageEngine<NullRenderer> {
    CollageEngine::new(NullRenderer::default(), CollageEngineConfig::default()).expect("engine init")
}

#[test]
fn plain_3x3_grid_is_820_square() {
    let mut engine = engine();
    let info = engine
        .render(&Chart::new(GridSize::new(3, 3)))
        .expect("render");
    assert_eq!(info.viewport(), Viewport::new(820, 820));
    assert_eq!(engine.renderer().viewport(), Viewport::new(820, 820));
}

#[test]
fn chart_title_adds_60_to_height_only() {
    let mut engine = engine();
    let info = engine
        .render(&Chart::new(GridSize::new(3, 3)).with_title("X"))
        .expect("render");
    assert_eq!(info.viewport(), Viewport::new(820, 880));
}

#[test]
fn right_caption_column_widens_canvas() {
    let chart = Chart::new(GridSize::new(3, 3))
        .with_item_at(4, item("Title", 300, 300).with_creator("Creator"))
        .with_titles(TitlePosition::Right);
    let mut engine = engine();
    let info = engine.render(&chart).expect("render").clone();

    let measured = engine
        .renderer()
        .measure_text("Creator - Title", &FontSpec::new("monospace", 16.0))
        .expect("measure");
    assert_abs_diff_eq!(info.title_column_width, measured + 20.0 + 10.0, epsilon = 1e-9);
    assert_eq!(info.pixel_width, (820.0 + measured + 30.0).floor() as u32);
    assert_eq!(info.pixel_height, 820);
}

#[test]
fn tiered_large_places_first_and_quarter_tier_slots() {
    let chart = Chart::new(GridSize::new(10, 10))
        .with_layout(LayoutMode::Tiered, TieredSize::Large)
        .with_item_at(0, item("Big", 1000, 1000))
        .with_item_at(59, item("Small", 1000, 1000));
    let mut engine = engine();
    let info = engine.render(&chart).expect("render").clone();

    let first = info.layout.slot(0).expect("slot 0");
    assert_eq!((first.x, first.y, first.cell_size), (10.0, 10.0, 520.0));
    assert_eq!(info.scaled_dimensions_of(0), Some(ScaledSize::new(520, 520)));

    let quarter = info.layout.slot(59).expect("slot 59");
    let previous_row_start = info.layout.slot(29).expect("slot 29");
    assert_eq!(quarter.cell_size, 65.0);
    assert_eq!(quarter.x, 65.0 + 10.0 + 10.0);
    assert!(quarter.y > previous_row_start.y);
    assert_eq!(info.scaled_dimensions_of(59), Some(ScaledSize::new(65, 65)));
}

#[test]
fn wide_cover_is_shrunk_and_centered() {
    let chart = Chart::new(GridSize::new(1, 1)).with_item_at(0, item("Wide", 600, 300));
    let mut engine = engine();
    let frame = engine.build_render_frame(&chart).expect("frame");

    let images: Vec<_> = frame.images().collect();
    assert_eq!(images.len(), 1);
    assert_eq!(
        (images[0].x, images[0].y, images[0].width, images[0].height),
        (10.0, 75.0, 260.0, 130.0)
    );
}

#[test]
fn items_past_grid_capacity_are_not_drawn() {
    let chart = Chart::new(GridSize::new(1, 1))
        .with_item_at(0, item("Shown", 260, 260))
        .with_item_at(3, item("Hidden", 260, 260));
    let mut engine = engine();
    let frame = engine.build_render_frame(&chart).expect("frame");
    assert_eq!(frame.images().count(), 1);
    assert_eq!(engine.item_coords().map(|coords| coords.len()), Some(1));
}

#[test]
fn pending_cover_draws_nothing_but_keeps_a_rect() {
    let chart = Chart::new(GridSize::new(1, 1))
        .with_item_at(0, ItemSlot::new("Loading", ImageRef::pending("slow.jpg")));
    let mut engine = engine();
    let frame = engine.build_render_frame(&chart).expect("frame");
    assert_eq!(frame.images().count(), 0);

    let entry = engine
        .item_coords()
        .and_then(|coords| coords.get(0))
        .copied()
        .expect("recorded rect");
    assert!(!entry.placeholder);
    assert_eq!(entry.rect.width(), 0.0);
    assert_eq!(entry.rect.height(), 0.0);
}

#[test]
fn background_color_fills_whole_canvas_first() {
    let chart = Chart::new(GridSize::new(2, 1)).with_background(Background::color("#fff"));
    let mut engine = engine();
    let frame = engine.build_render_frame(&chart).expect("frame");
    match frame.commands.first() {
        Some(DrawCommand::FillRect(rect)) => {
            assert_eq!((rect.x, rect.y, rect.width, rect.height), (0.0, 0.0, 550.0, 280.0));
            assert_eq!(rect.fill_color, Color::WHITE);
        }
        other => panic!("expected background fill, got {other:?}"),
    }
}

#[test]
fn unparseable_background_color_paints_black() {
    let chart = Chart::new(GridSize::new(1, 1)).with_background(Background::color("tomato"));
    let mut engine = engine();
    let frame = engine.build_render_frame(&chart).expect("frame");
    let rect = frame.rects().next().copied().expect("background");
    assert_eq!(rect.fill_color, Color::BLACK);
}

#[test]
fn background_image_covers_canvas() {
    let background = cover("bg.jpg", 1920, 1080);
    let chart = Chart::new(GridSize::new(3, 3)).with_background(Background::image(background));
    let mut engine = engine();
    let frame = engine.build_render_frame(&chart).expect("frame");

    let image = frame.images().next().expect("background image");
    assert_eq!(image.image.key(), "bg.jpg");
    assert_eq!(image.height, 820.0);
    assert_abs_diff_eq!(image.width, 820.0 * 1920.0 / 1080.0, epsilon = 1e-6);
    assert_eq!(image.x, ((820.0 - image.width) / 2.0).floor());
    assert_eq!(image.y, 0.0);
}

#[test]
fn tall_background_image_fills_width_and_centers_vertically() {
    let background = cover("tall.jpg", 1000, 2000);
    let chart = Chart::new(GridSize::new(3, 3)).with_background(Background::image(background));
    let mut engine = engine();
    let frame = engine.build_render_frame(&chart).expect("frame");

    assert_eq!(frame.commands.len(), 1);
    let image = frame.images().next().expect("background image");
    assert_eq!(
        (image.x, image.y, image.width, image.height),
        (0.0, -410.0, 820.0, 1640.0)
    );
}

#[test]
fn failed_background_image_is_skipped() {
    let failed = ImageRef::new("broken.jpg", Arc::new(ImageMetadata::failed()));
    let chart = Chart::new(GridSize::new(3, 3))
        .with_background(Background::image(failed))
        .with_item_at(0, item("A", 260, 260));
    let mut engine = engine();
    let frame = engine.build_render_frame(&chart).expect("frame");

    assert!(frame.rects().next().is_none());
    let keys: Vec<_> = frame.images().map(|image| image.image.key().to_owned()).collect();
    assert_eq!(keys, ["A.jpg"]);
}

#[test]
fn pending_background_image_is_skipped() {
    let chart = Chart::new(GridSize::new(1, 1))
        .with_background(Background::image(ImageRef::pending("bg.jpg")));
    let mut engine = engine();
    let frame = engine.build_render_frame(&chart).expect("frame");
    assert!(frame.is_empty());
}

#[test]
fn commands_follow_paint_order() {
    let chart = Chart::new(GridSize::new(2, 1))
        .with_title("Top")
        .with_item_at(0, item("A", 260, 260))
        .with_titles(TitlePosition::Right)
        .with_shadows(true);
    let mut engine = engine();
    let frame = engine.build_render_frame(&chart).expect("frame");

    assert!(matches!(frame.commands[0], DrawCommand::FillRect(_)));
    assert_eq!(
        frame.commands[1],
        DrawCommand::SetShadow(Some(ShadowStyle::default()))
    );
    match &frame.commands[2] {
        DrawCommand::Text(text) => {
            assert_eq!(text.text, "Top");
            assert_eq!(text.x, f64::from(engine.canvas_info().expect("info").pixel_width) / 2.0);
            assert_eq!(text.y, 50.0);
            assert_eq!(text.font.size_px, 38.0);
        }
        other => panic!("expected chart title, got {other:?}"),
    }
    assert!(matches!(frame.commands[3], DrawCommand::Image(_)));
    assert!(matches!(frame.commands[4], DrawCommand::Text(_)));
    assert_eq!(frame.commands.len(), 5);
}

#[test]
fn invalid_text_color_renders_white() {
    let chart = Chart::new(GridSize::new(1, 1))
        .with_title("T")
        .with_text_color("red");
    let mut engine = engine();
    let frame = engine.build_render_frame(&chart).expect("frame");
    assert!(frame.texts().all(|text| text.color == Color::WHITE));
}

#[test]
fn repeated_renders_are_identical() {
    let chart = Chart::new(GridSize::new(3, 2))
        .with_title("Again")
        .with_item_at(1, item("B", 400, 200).with_creator("Someone"))
        .with_titles(TitlePosition::Below)
        .with_numbers(true)
        .with_shadows(true);
    let mut engine = engine();
    engine.render(&chart).expect("first render");
    let first = engine.renderer().last_frame.clone().expect("first frame");
    engine.render(&chart).expect("second render");
    let second = engine.renderer().last_frame.clone().expect("second frame");
    assert_eq!(first, second);
    assert_eq!(engine.renderer().resize_count, 2);
}

#[test]
fn unavailable_surface_aborts_render() {
    let mut engine = CollageEngine::new(NullRenderer::unavailable(), CollageEngineConfig::default())
        .expect("engine init");
    let err = engine
        .render(&Chart::new(GridSize::new(2, 2)))
        .expect_err("render must fail");
    assert!(matches!(err, ChartError::SurfaceUnavailable(_)));
    assert!(engine.canvas_info().is_none());
}

#[test]
fn zero_sized_grid_is_rejected() {
    let mut engine = engine();
    let err = engine
        .render(&Chart::new(GridSize::new(0, 2)))
        .expect_err("zero columns must fail");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn cell_size_config_drives_font_and_canvas() {
    let mut engine = CollageEngine::new(
        NullRenderer::default(),
        CollageEngineConfig::default().with_cell_size(100),
    )
    .expect("engine init");
    let info = engine
        .render(&Chart::new(GridSize::new(2, 2)))
        .expect("render")
        .clone();
    assert_eq!(info.viewport(), Viewport::new(230, 230));
    assert_eq!(info.font_size_px, 6.0);
}

#[test]
fn too_small_cell_size_is_rejected() {
    let result = CollageEngine::new(
        NullRenderer::default(),
        CollageEngineConfig::default().with_cell_size(16),
    );
    assert!(result.is_err());
}

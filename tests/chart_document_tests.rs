use std::collections::HashMap;
use std::sync::Arc;

use collage_rs::api::{CollageEngine, CollageEngineConfig};
use collage_rs::core::{
    BackgroundKind, ChartDocument, ImageRef, LayoutMode, RasterImage, TieredSize, Viewport,
};
use collage_rs::render::NullRenderer;
use serde_json::Value;

const CORPUS_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/collage_charts/corpus.json"
);

fn load_corpus() -> Value {
    let raw = std::fs::read_to_string(CORPUS_PATH).expect("read corpus");
    serde_json::from_str(&raw).expect("parse corpus")
}

fn synthetic_images(fixture: &Value) -> HashMap<String, ImageRef> {
    fixture["images"]
        .as_object()
        .map(|images| {
            images
                .iter()
                .map(|(url, spec)| {
                    let dimension = |key: &str| {
                        u32::try_from(spec[key].as_u64().expect("dimension")).expect("u32")
                    };
                    let raster =
                        RasterImage::solid(dimension("width"), dimension("height"), [0, 0, 0, 255]);
                    (url.clone(), ImageRef::new(url.clone(), Arc::new(raster)))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn every_corpus_fixture_renders_headless() {
    let corpus = load_corpus();
    assert_eq!(corpus["schema_version"], 1);
    let fixtures = corpus["fixtures"].as_array().expect("fixtures");
    assert!(!fixtures.is_empty());

    for fixture in fixtures {
        let document: ChartDocument =
            serde_json::from_value(fixture["chart"].clone()).expect("chart document");
        let config: CollageEngineConfig = fixture
            .get("engine")
            .map(|engine| serde_json::from_value(engine.clone()).expect("engine config"))
            .unwrap_or_default();
        let chart = document.resolve(&synthetic_images(fixture));

        let mut engine =
            CollageEngine::new(NullRenderer::default(), config).expect("engine init");
        let info = engine.render(&chart).expect("render");
        assert!(info.pixel_width > 0 && info.pixel_height > 0, "{}", fixture["id"]);
        assert!(engine.renderer().last_frame.is_some());
    }
}

#[test]
fn document_defaults_fill_missing_fields() {
    let document = ChartDocument::from_json_str(r#"{"size": {"x": 2, "y": 3}}"#)
        .expect("minimal document");
    assert_eq!(document.gap, 10);
    assert_eq!(document.layout, LayoutMode::Grid);
    assert_eq!(document.tiered_size, TieredSize::Large);
    assert_eq!(document.background.kind, BackgroundKind::Color);
    assert!(!document.show_titles);

    let chart = document.resolve(&HashMap::new());
    let mut engine = CollageEngine::new(NullRenderer::default(), CollageEngineConfig::default())
        .expect("engine init");
    let info = engine.render(&chart).expect("render");
    assert_eq!(info.viewport(), Viewport::new(550, 820));
}

#[test]
fn unknown_cover_urls_resolve_to_pending_images() {
    let document = ChartDocument::from_json_str(
        r#"{
            "items": [{"title": "Lost", "coverURL": "nowhere.jpg"}],
            "size": {"x": 1, "y": 1}
        }"#,
    )
    .expect("document");
    let chart = document.resolve(&HashMap::new());
    let slot = chart.item(0).expect("item");
    assert_eq!(slot.cover_url, "nowhere.jpg");
    assert!(!slot.cover.is_ready());
}

#[test]
fn malformed_document_is_invalid_data() {
    let err = ChartDocument::from_json_str(r#"{"size": "big"}"#).expect_err("must fail");
    assert!(matches!(err, collage_rs::ChartError::InvalidData(_)));
}

#[test]
fn engine_config_round_trips_through_json() {
    let config = CollageEngineConfig::default()
        .with_cell_size(520)
        .with_right_caption_truncation(false);
    let json = config.to_json_pretty().expect("serialize");
    assert_eq!(CollageEngineConfig::from_json_str(&json).expect("parse"), config);
    assert!(CollageEngineConfig::from_json_str(r#"{"cell_size": 4}"#).is_err());
}

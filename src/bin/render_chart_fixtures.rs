use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use collage_rs::api::{CollageEngine, CollageEngineConfig};
use collage_rs::core::{ChartDocument, ImageRef, RasterImage, Viewport};
use collage_rs::render::CairoRenderer;
use serde::Deserialize;

const DEFAULT_MANIFEST_PATH: &str = "tests/fixtures/collage_charts/corpus.json";
const DEFAULT_OUTPUT_ROOT: &str = "tests/fixtures/collage_charts/reference_png";

#[derive(Debug, Deserialize)]
struct FixtureCorpus {
    schema_version: u32,
    fixtures: Vec<ChartFixture>,
}

#[derive(Debug, Deserialize)]
struct ChartFixture {
    id: String,
    description: String,
    #[serde(default)]
    engine: Option<CollageEngineConfig>,
    chart: ChartDocument,
    /// Synthetic covers keyed by URL, painted as solid blocks.
    #[serde(default)]
    images: HashMap<String, SyntheticImage>,
}

#[derive(Debug, Deserialize)]
struct SyntheticImage {
    width: u32,
    height: u32,
    rgba: [u8; 4],
}

#[derive(Debug)]
struct CliArgs {
    manifest_path: PathBuf,
    output_root: PathBuf,
    only_fixture_id: Option<String>,
}

fn main() {
    let _ = collage_rs::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let raw = fs::read_to_string(&args.manifest_path).map_err(|err| {
        format!(
            "failed to read manifest `{}`: {err}",
            args.manifest_path.display()
        )
    })?;
    let corpus: FixtureCorpus = serde_json::from_str(&raw)
        .map_err(|err| format!("failed to parse manifest json: {err}"))?;
    if corpus.schema_version != 1 {
        return Err(format!(
            "unsupported fixture schema version: {}",
            corpus.schema_version
        ));
    }

    let mut generated_count = 0usize;
    for fixture in &corpus.fixtures {
        if args
            .only_fixture_id
            .as_ref()
            .is_some_and(|id| id != &fixture.id)
        {
            continue;
        }

        let images: HashMap<String, ImageRef> = fixture
            .images
            .iter()
            .map(|(url, image)| {
                let raster = RasterImage::solid(image.width, image.height, image.rgba);
                (url.clone(), ImageRef::new(url.clone(), Arc::new(raster)))
            })
            .collect();
        let chart = fixture.chart.resolve(&images);

        let renderer = CairoRenderer::new(Viewport::new(1, 1))
            .map_err(|err| format!("fixture `{}` renderer init failed: {err}", fixture.id))?;
        let mut engine = CollageEngine::new(renderer, fixture.engine.unwrap_or_default())
            .map_err(|err| format!("fixture `{}` engine init failed: {err}", fixture.id))?;
        engine
            .render(&chart)
            .map_err(|err| format!("fixture `{}` render failed: {err}", fixture.id))?;

        let output_path = output_path_for(&fixture.id, &args.output_root);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                format!("failed to create output dir `{}`: {err}", parent.display())
            })?;
        }
        let mut file = File::create(&output_path).map_err(|err| {
            format!(
                "failed to create png `{}` for fixture `{}`: {err}",
                output_path.display(),
                fixture.id
            )
        })?;
        engine
            .renderer()
            .write_png(&mut file)
            .map_err(|err| format!("failed to write png `{}`: {err}", output_path.display()))?;

        generated_count += 1;
        println!(
            "generated {} [{}] -> {}",
            fixture.id,
            fixture.description,
            output_path.display()
        );
    }

    println!("done: generated {generated_count} fixture png(s)");
    Ok(())
}

fn output_path_for(fixture_id: &str, output_root: &Path) -> PathBuf {
    output_root.join(format!("{fixture_id}.png"))
}

fn parse_args() -> Result<CliArgs, String> {
    let mut manifest_path = PathBuf::from(DEFAULT_MANIFEST_PATH);
    let mut output_root = PathBuf::from(DEFAULT_OUTPUT_ROOT);
    let mut only_fixture_id: Option<String> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--manifest" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --manifest".to_owned())?;
                manifest_path = PathBuf::from(value);
            }
            "--output-root" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output-root".to_owned())?;
                output_root = PathBuf::from(value);
            }
            "--only" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --only".to_owned())?;
                only_fixture_id = Some(value);
            }
            "--help" | "-h" => {
                println!("{}", usage_message());
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument `{arg}`\n\n{}", usage_message()));
            }
        }
    }

    Ok(CliArgs {
        manifest_path,
        output_root,
        only_fixture_id,
    })
}

fn usage_message() -> String {
    format!(
        "usage: render_chart_fixtures [--manifest <path>] [--output-root <dir>] [--only <fixture-id>]\n\
         defaults: --manifest {DEFAULT_MANIFEST_PATH} --output-root {DEFAULT_OUTPUT_ROOT}"
    )
}

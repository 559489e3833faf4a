//! collage-rs: layout and raster rendering engine for cover-art collage charts.
//!
//! A render pass flows one way: a resolved `Chart` is measured into a
//! `CanvasInfo`, painted into an ordered `RenderFrame`, and handed to a
//! `Renderer` backend. The slot rectangles recorded while painting back the
//! pointer hit testing in `interaction`.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{CanvasInfo, CollageEngine, CollageEngineConfig};
pub use error::{ChartError, ChartResult};

pub mod chart;
pub mod constants;
pub mod image;
pub mod tiers;
pub mod types;

pub use chart::{
    Background, BackgroundDocument, BackgroundKind, Chart, ChartDocument, DocumentSize,
    ItemDocument, ItemSlot, LayoutMode, TieredSize, TitlePosition,
};
pub use image::{
    ImageMetadata, ImageRef, ImageResolver, ImageSource, LoadState, RasterImage,
    scaled_dimensions,
};
pub use tiers::{LARGE_TIER_TABLE, MEDIUM_TIER_TABLE, TierSlot, TierSpec, TierTable};
pub use types::{CellCoords, ClientSize, GridSize, PixelRect, ScaledSize, Viewport};

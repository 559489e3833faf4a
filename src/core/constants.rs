//! Named styling and layout constants.
//!
//! Every fixed number the layout and paint passes depend on lives here so the
//! visible product behavior can be audited in one place.

/// Default cell edge in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 260;

/// Smallest cell size whose derived font size is at least 1px.
pub const MIN_CELL_SIZE: u32 = 17;

/// `cell_size / FONT_SIZE_RATIO` gives the caption font size (16px at 260px cells).
pub const FONT_SIZE_RATIO: f64 = 16.25;

pub const DEFAULT_FONT_FAMILY: &str = "monospace";

/// Default caption/title fill, `#ffffff`.
pub const DEFAULT_TEXT_RGB: (u8, u8, u8) = (255, 255, 255);

/// Height reserved at the top of the canvas for a non-empty chart title.
pub const CHART_TITLE_MARGIN: f64 = 60.0;

pub const CHART_TITLE_FONT_SIZE: f64 = 38.0;

/// Chart title baseline is `(gap + CHART_TITLE_BASELINE_BASE) / 2`.
pub const CHART_TITLE_BASELINE_BASE: f64 = 90.0;

pub const CHART_TITLE_OUTLINE_WIDTH: f64 = 0.2;

pub const CAPTION_OUTLINE_WIDTH: f64 = 0.3;

/// Extra width added to the longest right-column caption.
pub const CAPTION_COLUMN_BUFFER: f64 = 20.0;

/// Left inset of right-column captions inside their column.
pub const CAPTION_COLUMN_INSET: f64 = 10.0;

/// Vertical padding (15px above and below) of a below-row caption band.
pub const CAPTION_BAND_PADDING: f64 = 30.0;

/// Lift of the first below-row caption line from the band center.
pub const CAPTION_BAND_BASELINE_LIFT: f64 = 7.0;

/// Gap between the title line and the creator line, on top of the font size.
pub const CREATOR_LINE_GAP: f64 = 10.0;

/// Right-column line spacing factor while the grid is narrower than
/// `CAPTION_DENSE_COLUMNS`.
pub const CAPTION_LINE_SPACING: f64 = 1.5;

/// From this many columns on, right-column captions are squeezed to
/// `floor(cell_size / columns)` apart and may overlap.
pub const CAPTION_DENSE_COLUMNS: usize = 11;

/// Truncation bound is `floor((cell + gap) / (font_size / CAPTION_TRUNCATION_RATIO))`.
pub const CAPTION_TRUNCATION_RATIO: f64 = 1.4;

pub const ELLIPSIS: &str = "...";

pub const SHADOW_OFFSET_X: f64 = 2.0;
pub const SHADOW_OFFSET_Y: f64 = 2.0;
pub const SHADOW_BLUR: f64 = 4.0;
pub const SHADOW_ALPHA: f64 = 0.6;

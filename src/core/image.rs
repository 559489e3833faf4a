use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::types::ScaledSize;
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    Pending,
    Ready,
    Failed,
}

/// Minimal view of a loaded (or loading) image.
///
/// The engine only needs natural dimensions and readiness. Backends that
/// actually rasterize also ask for straight-alpha RGBA pixels.
pub trait ImageSource: fmt::Debug + Send + Sync {
    fn natural_size(&self) -> (u32, u32);

    fn load_state(&self) -> LoadState;

    fn is_ready(&self) -> bool {
        self.load_state() == LoadState::Ready
    }

    /// Tightly packed RGBA8 rows, `width * height * 4` bytes.
    fn rgba_pixels(&self) -> Option<&[u8]> {
        None
    }
}

/// Dimensions-only handle, enough for layout and headless rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub state: LoadState,
}

impl ImageMetadata {
    #[must_use]
    pub fn ready(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            state: LoadState::Ready,
        }
    }

    #[must_use]
    pub fn pending() -> Self {
        Self {
            width: 0,
            height: 0,
            state: LoadState::Pending,
        }
    }

    #[must_use]
    pub fn failed() -> Self {
        Self {
            width: 0,
            height: 0,
            state: LoadState::Failed,
        }
    }
}

impl ImageSource for ImageMetadata {
    fn natural_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn load_state(&self) -> LoadState {
        self.state
    }
}

/// Decoded image held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl RasterImage {
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> ChartResult<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(ChartError::InvalidData(format!(
                "rgba buffer has {} bytes, expected {expected} for {width}x{height}",
                rgba.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Uniformly colored image, used for fixtures and placeholders.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut buffer = Vec::with_capacity(pixel_count * 4);
        for _ in 0..pixel_count {
            buffer.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            rgba: buffer,
        }
    }
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

impl ImageSource for RasterImage {
    fn natural_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn load_state(&self) -> LoadState {
        LoadState::Ready
    }

    fn rgba_pixels(&self) -> Option<&[u8]> {
        Some(&self.rgba)
    }
}

/// Shared image handle keyed by its source URL.
///
/// Equality compares the key and the observable layout state, not pixels, so
/// two frames built from the same chart compare equal.
#[derive(Debug, Clone)]
pub struct ImageRef {
    key: String,
    source: Arc<dyn ImageSource>,
}

impl ImageRef {
    #[must_use]
    pub fn new(key: impl Into<String>, source: Arc<dyn ImageSource>) -> Self {
        Self {
            key: key.into(),
            source,
        }
    }

    /// Handle for an image whose load has not completed.
    #[must_use]
    pub fn pending(key: impl Into<String>) -> Self {
        Self::new(key, Arc::new(ImageMetadata::pending()))
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn source(&self) -> &dyn ImageSource {
        self.source.as_ref()
    }

    #[must_use]
    pub fn natural_size(&self) -> (u32, u32) {
        self.source.natural_size()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.source.is_ready()
    }
}

impl PartialEq for ImageRef {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.natural_size() == other.natural_size()
            && self.source.load_state() == other.source.load_state()
    }
}

/// Maps image URLs to loaded handles.
pub trait ImageResolver {
    fn resolve_image(&self, url: &str) -> Option<ImageRef>;
}

impl ImageResolver for HashMap<String, ImageRef> {
    fn resolve_image(&self, url: &str) -> Option<ImageRef> {
        self.get(url).cloned()
    }
}

/// Fits an image of natural size `natural` into a square cell of edge `cell_size`.
///
/// Both axes larger: shrink to fit. Exactly one axis larger: scale by that
/// axis alone. Both axes smaller: grow until one axis touches the cell.
/// Otherwise (an axis equals the cell and none exceeds it) keep natural size.
/// Results are floored. A zero natural dimension yields `(0, 0)`.
#[must_use]
pub fn scaled_dimensions(natural: (u32, u32), cell_size: f64) -> ScaledSize {
    let (width, height) = natural;
    if width == 0 || height == 0 {
        return ScaledSize::new(0, 0);
    }

    let w = f64::from(width);
    let h = f64::from(height);
    let factor = if w > cell_size && h > cell_size {
        (cell_size / w).min(cell_size / h)
    } else if w > cell_size {
        cell_size / w
    } else if h > cell_size {
        cell_size / h
    } else if w < cell_size && h < cell_size {
        (cell_size / w).min(cell_size / h)
    } else {
        1.0
    };

    ScaledSize::new((w * factor).floor() as u32, (h * factor).floor() as u32)
}

#[cfg(test)]
mod tests {
    use super::{ImageMetadata, ImageRef, ImageSource, RasterImage, scaled_dimensions};
    use crate::core::types::ScaledSize;
    use std::sync::Arc;

    #[test]
    fn both_axes_larger_shrinks_to_fit() {
        assert_eq!(scaled_dimensions((600, 300), 260.0), ScaledSize::new(260, 130));
    }

    #[test]
    fn one_axis_larger_scales_by_that_axis() {
        assert_eq!(scaled_dimensions((520, 100), 260.0), ScaledSize::new(260, 50));
        assert_eq!(scaled_dimensions((100, 520), 260.0), ScaledSize::new(50, 260));
    }

    #[test]
    fn both_axes_smaller_grows_to_touch() {
        assert_eq!(scaled_dimensions((100, 50), 260.0), ScaledSize::new(260, 130));
    }

    #[test]
    fn axis_equal_to_cell_keeps_natural_size() {
        assert_eq!(scaled_dimensions((260, 100), 260.0), ScaledSize::new(260, 100));
    }

    #[test]
    fn unloaded_image_scales_to_zero() {
        assert_eq!(scaled_dimensions((0, 0), 260.0), ScaledSize::new(0, 0));
    }

    #[test]
    fn image_ref_equality_ignores_pixels() {
        let a = ImageRef::new("a.png", Arc::new(RasterImage::solid(2, 2, [0, 0, 0, 255])));
        let b = ImageRef::new("a.png", Arc::new(ImageMetadata::ready(2, 2)));
        assert_eq!(a, b);
        assert_ne!(a, ImageRef::pending("a.png"));
    }

    #[test]
    fn raster_image_rejects_short_buffer() {
        assert!(RasterImage::from_rgba(2, 2, vec![0; 15]).is_err());
        let image = RasterImage::from_rgba(1, 1, vec![1, 2, 3, 4]).expect("valid buffer");
        assert_eq!(image.rgba_pixels(), Some(&[1u8, 2, 3, 4][..]));
    }
}

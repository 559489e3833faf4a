use serde::{Deserialize, Serialize};

/// Logical pixel size of a rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Rendered (CSS/client) size of an on-screen surface.
///
/// May differ from the logical `Viewport` when the host scales the surface
/// element to fit its container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClientSize {
    pub width: f64,
    pub height: f64,
}

impl ClientSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Grid dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub columns: u32,
    pub rows: u32,
}

impl GridSize {
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.columns > 0 && self.rows > 0
    }

    /// Number of cells that are rendered; entries past this are kept but ignored.
    #[must_use]
    pub fn capacity(self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Row-major cell coordinates of a linear index.
    #[must_use]
    pub fn coords_of(self, index: usize) -> CellCoords {
        let columns = self.columns.max(1) as usize;
        CellCoords::new(index % columns, index / columns)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCoords {
    pub column: usize,
    pub row: usize,
}

impl CellCoords {
    #[must_use]
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

/// Integer size of a scaled cover image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScaledSize {
    pub width: u32,
    pub height: u32,
}

impl ScaledSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Inclusive pixel rectangle `[x0, x1] x [y0, y1]` in logical surface space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl PixelRect {
    #[must_use]
    pub fn from_origin(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: (x, x + width),
            y: (y, y + height),
        }
    }

    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x.0 && x <= self.x.1 && y >= self.y.0 && y <= self.y.1
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.x.1 - self.x.0
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.y.1 - self.y.0
    }
}

#[cfg(test)]
mod tests {
    use super::{GridSize, PixelRect};

    #[test]
    fn grid_coords_are_row_major() {
        let grid = GridSize::new(3, 4);
        assert_eq!(grid.capacity(), 12);
        let coords = grid.coords_of(7);
        assert_eq!((coords.column, coords.row), (1, 2));
    }

    #[test]
    fn pixel_rect_bounds_are_inclusive() {
        let rect = PixelRect::from_origin(10.0, 20.0, 5.0, 5.0);
        assert!(rect.contains(10.0, 20.0));
        assert!(rect.contains(15.0, 25.0));
        assert!(!rect.contains(15.5, 25.0));
    }
}

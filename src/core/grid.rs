//! Grid module - the occupancy store
//!
//! A width x height array of optional unit handles, flat row-major for cache
//! locality. This is a pure state container: callers validate coordinates
//! with [`Grid::in_bounds`] before touching a cell. An out-of-bounds access
//! is a caller bug and panics, because continuing would corrupt the
//! occupancy invariant with no way to repair it locally.

use crate::types::UnitId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    /// Flat array of slots, row-major order (y * width + x)
    cells: Vec<Option<UnitId>>,
}

impl Grid {
    /// Create an empty grid. Dimensions must already be clamped legal.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "degenerate grid {width}x{height}");
        Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> usize {
        assert!(self.in_bounds(x, y), "cell ({x}, {y}) out of bounds");
        (y * self.width + x) as usize
    }

    pub fn get(&self, x: i32, y: i32) -> Option<UnitId> {
        self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: i32, y: i32, unit: Option<UnitId>) {
        let idx = self.index(x, y);
        self.cells[idx] = unit;
    }

    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_none()
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some()
    }
}

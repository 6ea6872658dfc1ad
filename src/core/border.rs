//! Border module - the conveyor path and push geometry
//!
//! The conveyor is an ordered chain of border cells: bottom row left to
//! right, right column bottom to top (corners excluded), top row right to
//! left. Its head, cell (0, 0), is where units leave the queue; its tail is
//! where replacements spawn. The left interior column is ordinary playfield
//! and not part of the chain.

use arrayvec::ArrayVec;

use crate::core::grid::Grid;
use crate::types::MAX_BORDER_CELLS;

/// The conveyor path, in queue order.
pub type BorderSeq = ArrayVec<(i32, i32), MAX_BORDER_CELLS>;

/// Build the conveyor path for a board of the given dimensions.
pub fn border_sequence(width: i32, height: i32) -> BorderSeq {
    let mut cells = BorderSeq::new();

    // Bottom row, left to right.
    for x in 0..width {
        cells.push((x, height - 1));
    }
    // Right column, bottom to top, without the corners.
    for y in (1..height - 1).rev() {
        cells.push((width - 1, y));
    }
    // Top row, right to left.
    for x in (0..width).rev() {
        cells.push((x, 0));
    }

    cells
}

pub fn is_corner(width: i32, height: i32, x: i32, y: i32) -> bool {
    (x == 0 || x == width - 1) && (y == 0 || y == height - 1)
}

/// Classify a clicked cell as a push origin.
///
/// Returns the inward direction, or `None` for corners, interior cells and
/// the left column (left-column cells are only ever filled by the conveyor,
/// never pushed by the player).
pub fn push_direction(width: i32, height: i32, x: i32, y: i32) -> Option<(i32, i32)> {
    if x != width - 1 && y != 0 && y != height - 1 {
        return None;
    }
    if is_corner(width, height, x, y) {
        return None;
    }

    if y == 0 {
        // Top row pushes down (grid y grows downward).
        Some((0, 1))
    } else if y == height - 1 {
        Some((0, -1))
    } else {
        // Right column pushes left.
        Some((-1, 0))
    }
}

/// Walk from `(x, y)` along `dir` while the next cell is in bounds and
/// empty; return the farthest cell reached. Returns the origin itself when
/// the push is blocked immediately.
pub fn farthest_empty(grid: &Grid, x: i32, y: i32, dir: (i32, i32)) -> (i32, i32) {
    let (mut cx, mut cy) = (x, y);
    loop {
        let (tx, ty) = (cx + dir.0, cy + dir.1);
        if !grid.in_bounds(tx, ty) || grid.is_occupied(tx, ty) {
            break;
        }
        cx = tx;
        cy = ty;
    }
    (cx, cy)
}

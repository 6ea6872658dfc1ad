//! Pointer-to-cell selection for the border ring.
//!
//! The pointer rarely sits exactly on a cell, so selection snaps to the
//! nearest selectable border cell by squared screen distance. Ties keep the
//! earlier candidate, which makes the result stable across frames.

use arrayvec::ArrayVec;

use crate::types::MAX_BORDER_CELLS;

pub type Candidates = ArrayVec<(i32, i32), MAX_BORDER_CELLS>;

/// Cells the pointer may select: the conveyor head corner, the non-corner
/// cells of the top row and right column, and the bottom row up to but not
/// including its right corner. The left interior column belongs to the
/// playfield and is never selectable.
pub fn candidates(width: i32, height: i32) -> Candidates {
    let mut cells = Candidates::new();
    cells.push((0, 0));
    for x in 1..width - 1 {
        cells.push((x, 0));
    }
    for y in 1..height - 1 {
        cells.push((width - 1, y));
    }
    for x in 0..width - 1 {
        cells.push((x, height - 1));
    }
    cells
}

/// Snap a screen-space pointer to the nearest selectable cell.
pub fn resolve(
    width: i32,
    height: i32,
    pointer: (f32, f32),
    cell_to_screen: &impl Fn(i32, i32) -> (f32, f32),
) -> (i32, i32) {
    let mut best = (0, 0);
    let mut best_dist = f32::MAX;
    for (x, y) in candidates(width, height) {
        let (sx, sy) = cell_to_screen(x, y);
        let (dx, dy) = (sx - pointer.0, sy - pointer.1);
        let dist = dx * dx + dy * dy;
        if dist < best_dist {
            best_dist = dist;
            best = (x, y);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(x: i32, y: i32) -> (f32, f32) {
        (x as f32, y as f32)
    }

    #[test]
    fn test_right_corners_are_never_candidates() {
        let cells = candidates(6, 6);
        // The head corner and the sequence start stay selectable even
        // though pushing them is rejected; the right corners never appear.
        assert!(cells.contains(&(0, 0)));
        assert!(cells.contains(&(0, 5)));
        assert!(!cells.contains(&(5, 0)));
        assert!(!cells.contains(&(5, 5)));
    }

    #[test]
    fn test_candidates_exclude_left_column() {
        let cells = candidates(6, 6);
        for y in 1..5 {
            assert!(!cells.contains(&(0, y)));
        }
    }

    #[test]
    fn test_candidate_count() {
        // 1 seed + (w-2) top + (h-2) right + (w-1) bottom.
        assert_eq!(candidates(6, 6).len(), 14);
        assert_eq!(candidates(2, 3).len(), 3);
        assert_eq!(candidates(10, 10).len(), 26);
    }

    #[test]
    fn test_resolve_snaps_to_nearest() {
        assert_eq!(resolve(6, 6, (3.2, -0.4), &identity), (3, 0));
        assert_eq!(resolve(6, 6, (5.3, 2.8), &identity), (5, 3));
        assert_eq!(resolve(6, 6, (0.1, 4.9), &identity), (0, 5));
    }

    #[test]
    fn test_resolve_far_pointer_still_selects() {
        let cell = resolve(6, 6, (-100.0, -100.0), &identity);
        assert_eq!(cell, (0, 0));
    }

    #[test]
    fn test_resolve_tie_keeps_first_candidate() {
        // Equidistant between (2, 0) and (3, 0): candidate order wins.
        assert_eq!(resolve(6, 6, (2.5, 0.0), &identity), (2, 0));
    }
}

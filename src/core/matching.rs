//! Matching module - same-color run detection
//!
//! Scans every cell along the right and down axes (plus both down diagonals
//! when enabled) and marks runs of at least `line_length` for removal. The
//! scan is a pure mark pass over a boolean grid: removal is applied by the
//! board only after the whole grid has been scanned, so removals can never
//! shorten a run that is still being counted.

/// Axes scanned from each origin cell. Left/up runs are covered by the
/// cells further left/up scanning toward us.
const AXES: [(i32, i32); 2] = [(1, 0), (0, 1)];
const DIAGONAL_AXES: [(i32, i32); 2] = [(1, 1), (-1, 1)];

/// Length of the same-color run starting at `(x, y)` along `dir`.
/// Returns 0 when the origin cell is empty.
pub fn run_length(
    width: i32,
    height: i32,
    x: i32,
    y: i32,
    dir: (i32, i32),
    color_at: &impl Fn(i32, i32) -> Option<i32>,
) -> i32 {
    let Some(first) = color_at(x, y) else {
        return 0;
    };

    let mut count = 1;
    let (mut cx, mut cy) = (x + dir.0, y + dir.1);
    while cx >= 0 && cx < width && cy >= 0 && cy < height {
        match color_at(cx, cy) {
            Some(color) if color == first => count += 1,
            _ => break,
        }
        cx += dir.0;
        cy += dir.1;
    }

    count
}

fn mark_run(marks: &mut [bool], width: i32, x: i32, y: i32, count: i32, dir: (i32, i32)) {
    for i in 0..count {
        let cx = x + dir.0 * i;
        let cy = y + dir.1 * i;
        marks[(cy * width + cx) as usize] = true;
    }
}

/// Mark every cell that belongs to a removable run. The result is a
/// row-major boolean grid; marking is idempotent, so overlapping runs are
/// each counted once.
pub fn find_matches(
    width: i32,
    height: i32,
    line_length: i32,
    diagonal: bool,
    color_at: impl Fn(i32, i32) -> Option<i32>,
) -> Vec<bool> {
    let mut marks = vec![false; (width * height) as usize];

    for x in 0..width {
        for y in 0..height {
            for dir in AXES {
                let count = run_length(width, height, x, y, dir, &color_at);
                if count >= line_length {
                    mark_run(&mut marks, width, x, y, count, dir);
                }
            }
            if diagonal {
                for dir in DIAGONAL_AXES {
                    let count = run_length(width, height, x, y, dir, &color_at);
                    if count >= line_length {
                        mark_run(&mut marks, width, x, y, count, dir);
                    }
                }
            }
        }
    }

    marks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_grid(rows: &[&[i32]]) -> (i32, i32, Vec<Option<i32>>) {
        let height = rows.len() as i32;
        let width = rows[0].len() as i32;
        let mut cells = Vec::with_capacity((width * height) as usize);
        for row in rows {
            for &c in *row {
                cells.push(if c < 0 { None } else { Some(c) });
            }
        }
        (width, height, cells)
    }

    fn lookup(width: i32, cells: &[Option<i32>]) -> impl Fn(i32, i32) -> Option<i32> + '_ {
        move |x, y| cells[(y * width + x) as usize]
    }

    #[test]
    fn test_run_length_counts_same_color() {
        let (w, h, cells) = color_grid(&[&[1, 1, 1, 0]]);
        let at = lookup(w, &cells);
        assert_eq!(run_length(w, h, 0, 0, (1, 0), &at), 3);
        assert_eq!(run_length(w, h, 3, 0, (1, 0), &at), 1);
    }

    #[test]
    fn test_run_length_empty_origin_is_zero() {
        let (w, h, cells) = color_grid(&[&[-1, 1, 1]]);
        let at = lookup(w, &cells);
        assert_eq!(run_length(w, h, 0, 0, (1, 0), &at), 0);
    }

    #[test]
    fn test_run_stops_at_empty_cell() {
        let (w, h, cells) = color_grid(&[&[2, 2, -1, 2, 2]]);
        let at = lookup(w, &cells);
        assert_eq!(run_length(w, h, 0, 0, (1, 0), &at), 2);
    }

    #[test]
    fn test_horizontal_line_marked_exactly() {
        let (w, h, cells) = color_grid(&[
            &[0, 0, 0, 1],
            &[1, 2, 1, 2],
            &[2, 1, 2, 1],
        ]);
        let marks = find_matches(w, h, 3, false, lookup(w, &cells));
        let expected: Vec<bool> = (0..12).map(|i| i < 3).collect();
        assert_eq!(marks, expected);
    }

    #[test]
    fn test_shorter_runs_untouched() {
        let (w, h, cells) = color_grid(&[
            &[0, 0, 1, 1],
            &[1, 2, 1, 2],
            &[2, 1, 2, 1],
        ]);
        let marks = find_matches(w, h, 3, false, lookup(w, &cells));
        assert!(marks.iter().all(|&m| !m));
    }

    #[test]
    fn test_vertical_line_marked() {
        let (w, h, cells) = color_grid(&[
            &[3, 0, 1],
            &[3, 1, 0],
            &[3, 0, 1],
        ]);
        let marks = find_matches(w, h, 3, false, lookup(w, &cells));
        for y in 0..3 {
            assert!(marks[(y * w) as usize]);
        }
        assert_eq!(marks.iter().filter(|&&m| m).count(), 3);
    }

    #[test]
    fn test_diagonal_runs_need_flag() {
        let (w, h, cells) = color_grid(&[
            &[4, 0, 1],
            &[0, 4, 0],
            &[1, 0, 4],
        ]);
        let off = find_matches(w, h, 3, false, lookup(w, &cells));
        assert!(off.iter().all(|&m| !m));

        let on = find_matches(w, h, 3, true, lookup(w, &cells));
        assert!(on[0] && on[4] && on[8]);
        assert_eq!(on.iter().filter(|&&m| m).count(), 3);
    }

    #[test]
    fn test_left_down_diagonal() {
        let (w, h, cells) = color_grid(&[
            &[0, 1, 5],
            &[1, 5, 0],
            &[5, 0, 1],
        ]);
        let marks = find_matches(w, h, 3, true, lookup(w, &cells));
        assert!(marks[2] && marks[4] && marks[6]);
    }

    #[test]
    fn test_overlapping_runs_marked_once() {
        // A cross of color 0: both the row and the column qualify and share
        // the center cell.
        let (w, h, cells) = color_grid(&[
            &[1, 0, 2],
            &[0, 0, 0],
            &[2, 0, 1],
        ]);
        let marks = find_matches(w, h, 3, false, lookup(w, &cells));
        assert_eq!(marks.iter().filter(|&&m| m).count(), 5);
    }

    #[test]
    fn test_longer_than_line_length_fully_marked() {
        let (w, h, cells) = color_grid(&[&[6, 6, 6, 6, 6]]);
        let marks = find_matches(w, h, 3, false, lookup(w, &cells));
        assert!(marks.iter().all(|&m| m));
    }
}

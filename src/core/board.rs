//! Board module - occupancy, units, score and the conveyor algorithms
//!
//! The board owns every unit and is the single writer of the grid. All
//! mutation funnels through [`Board::spawn_unit`], [`Board::move_unit`] and
//! [`Board::remove_unit`], which keep the cross-reference invariant: an
//! occupied cell stores the id of a unit whose `Active` state names exactly
//! that cell, and no unit is referenced by two cells.
//!
//! The presentation layer learns about mutations from the event queue
//! ([`Board::take_events`]) instead of observing fields directly.

use crate::core::border::{self, BorderSeq};
use crate::core::grid::Grid;
use crate::core::matching;
use crate::core::rng::SimpleRng;
use crate::types::{Rules, Unit, UnitId, UnitState};

/// State changes raised to presentation collaborators, in the order they
/// happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    /// A unit appeared at a cell (presentation spawns a visual there).
    UnitSpawned {
        id: UnitId,
        x: i32,
        y: i32,
        color: i32,
    },
    /// A unit was assigned a new cell (presentation starts tweening).
    UnitMoved { id: UnitId, x: i32, y: i32 },
    /// A unit left the grid (presentation plays the exit sequence).
    UnitRemoved { id: UnitId },
    /// No legal move remains.
    GameOver,
}

#[derive(Debug, Clone)]
pub struct Board {
    rules: Rules,
    grid: Grid,
    units: Vec<Unit>,
    score: u32,
    /// True while any mutation this tick requires the presentation to catch
    /// up before the next step may run.
    busy: bool,
    next_id: u32,
    rng: SimpleRng,
    events: Vec<BoardEvent>,
}

impl Board {
    /// Build a fresh board: the full border ring is populated, then
    /// `initial_population` random interior cells. Rules are clamped here
    /// so invalid configuration can never reach the grid.
    pub fn new(rules: Rules, seed: u32) -> Self {
        let rules = rules.clamped();
        let mut board = Self {
            rules,
            grid: Grid::new(rules.width, rules.height),
            units: Vec::new(),
            score: 0,
            busy: false,
            next_id: 1,
            rng: SimpleRng::new(seed),
            events: Vec::new(),
        };
        board.populate();
        board
    }

    fn populate(&mut self) {
        let (w, h) = (self.rules.width, self.rules.height);

        // Top and bottom rows.
        for x in 0..w {
            self.spawn_unit(x, 0);
            self.spawn_unit(x, h - 1);
        }
        // Right column (corners already populated).
        for y in 1..h - 1 {
            self.spawn_unit(w - 1, y);
        }

        // Interior cells eligible for the starting population. The left
        // column belongs to the playfield, the right column does not.
        let mut empty: Vec<(i32, i32)> = Vec::with_capacity(((h - 2) * (w - 1)) as usize);
        for x in 0..w - 1 {
            for y in 1..h - 1 {
                empty.push((x, y));
            }
        }

        for _ in 0..self.rules.initial_population {
            let index = self.rng.next_range(empty.len() as u32) as usize;
            let (x, y) = empty.swap_remove(index);
            self.spawn_unit(x, y);
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn width(&self) -> i32 {
        self.rules.width
    }

    pub fn height(&self) -> i32 {
        self.rules.height
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub(crate) fn clear_busy(&mut self) {
        self.busy = false;
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// All live units, `Exiting` ones included.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_at(&self, x: i32, y: i32) -> Option<&Unit> {
        let id = self.grid.get(x, y)?;
        let unit = self.unit(id);
        debug_assert!(unit.is_some(), "grid references unknown unit {id:?}");
        unit
    }

    pub fn color_at(&self, x: i32, y: i32) -> Option<i32> {
        self.unit_at(x, y).map(|u| u.color)
    }

    /// Drain the pending event queue.
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: BoardEvent) {
        self.events.push(event);
    }

    /// Create a unit of a random color in an empty cell.
    fn spawn_unit(&mut self, x: i32, y: i32) {
        assert!(self.grid.is_empty(x, y), "spawn into occupied cell ({x}, {y})");

        let id = UnitId(self.next_id);
        self.next_id += 1;
        let color = self.rng.next_range(self.rules.num_colors as u32) as i32;

        self.units.push(Unit {
            id,
            color,
            state: UnitState::Active { x, y },
        });
        self.grid.set(x, y, Some(id));
        self.emit(BoardEvent::UnitSpawned { id, x, y, color });
        self.busy = true;
    }

    /// Re-home a unit to an empty cell. The presentation tweens it there.
    fn move_unit(&mut self, id: UnitId, x: i32, y: i32) {
        assert!(self.grid.is_empty(x, y), "move into occupied cell ({x}, {y})");

        let unit = self
            .units
            .iter_mut()
            .find(|u| u.id == id)
            .unwrap_or_else(|| panic!("moving unknown unit {id:?}"));
        let UnitState::Active { x: old_x, y: old_y } = unit.state else {
            panic!("moving exiting unit {id:?}");
        };
        unit.state = UnitState::Active { x, y };

        assert_eq!(self.grid.get(old_x, old_y), Some(id), "grid out of sync");
        self.grid.set(old_x, old_y, None);
        self.grid.set(x, y, Some(id));
        self.emit(BoardEvent::UnitMoved { id, x, y });
        self.busy = true;
    }

    /// Detach the unit at a cell and start its departure. The cell frees up
    /// immediately so the conveyor can refill it this very tick; the unit
    /// itself lingers as `Exiting` until its exit animation settles.
    fn remove_unit(&mut self, x: i32, y: i32) {
        let id = self
            .grid
            .get(x, y)
            .unwrap_or_else(|| panic!("removing from empty cell ({x}, {y})"));
        self.grid.set(x, y, None);

        let unit = self
            .units
            .iter_mut()
            .find(|u| u.id == id)
            .unwrap_or_else(|| panic!("grid references unknown unit {id:?}"));
        unit.state = UnitState::Exiting;

        self.score += 1;
        self.emit(BoardEvent::UnitRemoved { id });
        self.busy = true;
    }

    /// Resolve a click on a cell as a push: slide the unit inward to the
    /// farthest empty cell, then advance the conveyor in the same response
    /// so the queue does not wait a frame. Returns false for no-op clicks
    /// (corner, interior, or blocked push).
    pub fn push(&mut self, x: i32, y: i32) -> bool {
        let Some(dir) = border::push_direction(self.rules.width, self.rules.height, x, y) else {
            return false;
        };
        if self.grid.is_empty(x, y) {
            return false;
        }

        let (nx, ny) = border::farthest_empty(&self.grid, x, y, dir);
        if (nx, ny) == (x, y) {
            return false;
        }

        let id = self.grid.get(x, y).unwrap();
        self.move_unit(id, nx, ny);
        self.advance_border();
        true
    }

    /// One conveyor pass: pull units backward to fill gaps in queue order,
    /// then respawn the trailing empty slots so the border never keeps a
    /// permanent gap. Returns true if anything moved or spawned.
    pub fn advance_border(&mut self) -> bool {
        let seq: BorderSeq = border::border_sequence(self.rules.width, self.rules.height);
        let mut changed = false;

        // Fill each gap with the nearest occupied slot further along the
        // sequence, so units never jump over each other.
        for i in 0..seq.len() - 1 {
            let (x, y) = seq[i];
            if self.grid.is_occupied(x, y) {
                continue;
            }

            let next = seq[i + 1..]
                .iter()
                .find_map(|&(nx, ny)| self.grid.get(nx, ny));
            match next {
                Some(id) => {
                    self.move_unit(id, x, y);
                    changed = true;
                }
                // Only trailing empties remain.
                None => break,
            }
        }

        // Spawn replacements at the tail.
        for &(x, y) in seq.iter().rev() {
            if self.grid.is_occupied(x, y) {
                break;
            }
            self.spawn_unit(x, y);
            changed = true;
        }

        changed
    }

    /// Two-pass match step: mark the whole grid, then remove every marked
    /// unit. Returns the number of removed units (score rises by the same
    /// amount).
    pub fn find_and_remove_lines(&mut self) -> u32 {
        let (w, h) = (self.rules.width, self.rules.height);
        let marks = matching::find_matches(
            w,
            h,
            self.rules.line_length,
            self.rules.diagonal,
            |x, y| self.color_at(x, y),
        );

        let mut removed = 0;
        for x in 0..w {
            for y in 0..h {
                if marks[(y * w + x) as usize] {
                    self.remove_unit(x, y);
                    removed += 1;
                }
            }
        }
        removed
    }

    /// The player has a move iff some cell a push could vacate into is
    /// empty: the second row, the second-to-last row, or the second-to-last
    /// column. This deliberately does not simulate pushes.
    pub fn detect_game_over(&self) -> bool {
        let (w, h) = (self.rules.width, self.rules.height);

        // Second row.
        for x in 0..w - 1 {
            if self.grid.is_empty(x, 1) {
                return false;
            }
        }
        // Second-to-last row.
        for x in 0..w - 1 {
            if self.grid.is_empty(x, h - 2) {
                return false;
            }
        }
        // Second-to-last column; its end cells were covered by the rows.
        for y in 2..h - 2 {
            if self.grid.is_empty(w - 2, y) {
                return false;
            }
        }

        true
    }

    /// Drop `Exiting` units whose departure the presentation reports done.
    pub fn prune_exits(&mut self, is_settled: impl Fn(UnitId) -> bool) {
        self.units
            .retain(|u| !(u.state == UnitState::Exiting && is_settled(u.id)));
    }

    /// True if any unit's visual, exit sequences included, is still
    /// catching up with its logical target.
    pub fn any_unsettled(&self, is_settled: impl Fn(UnitId) -> bool) -> bool {
        self.units.iter().any(|u| !is_settled(u.id))
    }

    /// Panics unless every occupied cell and its unit agree on coordinates
    /// and no unit is referenced twice. Used by tests.
    pub fn assert_occupancy_invariant(&self) {
        let mut seen = Vec::new();
        for y in 0..self.rules.height {
            for x in 0..self.rules.width {
                let Some(id) = self.grid.get(x, y) else {
                    continue;
                };
                assert!(!seen.contains(&id), "unit {id:?} referenced twice");
                seen.push(id);

                let unit = self.unit(id).expect("grid references unknown unit");
                assert_eq!(
                    unit.state,
                    UnitState::Active { x, y },
                    "unit {id:?} disagrees with its cell"
                );
            }
        }
    }
}

//! Per-unit animation state.
//!
//! The rule engine jumps units between cells instantly; this module owns
//! the visuals that chase those cells over a few frames. It is also the
//! [`Presenter`] the engine polls, so a tick never advances past a unit
//! whose glyph is still in flight.
//!
//! Positions are kept in board space (cell units) and converted to screen
//! space only when drawing, which keeps animations stable across terminal
//! resizes.

use std::collections::HashMap;

use crate::core::{BoardEvent, Presenter};
use crate::types::{Unit, UnitId};

/// Fraction of the remaining distance covered per second.
const MOVE_RATE: f32 = 10.0;
const SCALE_RATE: f32 = 6.0;
/// Distance below which a value snaps onto its target.
const SNAP: f32 = 0.02;
const SPAWN_SCALE: f32 = 0.1;
const EXIT_SECS: f32 = 0.35;

/// Exponential approach with a snap to avoid asymptotic crawl.
pub(crate) fn approach(value: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let next = value + (target - value) * (rate * dt).min(1.0);
    if (next - target).abs() < SNAP {
        target
    } else {
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum VisualState {
    Alive,
    Exiting { left: f32 },
}

#[derive(Debug, Clone, Copy)]
pub struct UnitVisual {
    pub color: i32,
    /// Board-space position, chasing `target`.
    pub pos: (f32, f32),
    target: (f32, f32),
    /// Grows from [`SPAWN_SCALE`] to 1.0 after spawning.
    pub scale: f32,
    state: VisualState,
}

impl UnitVisual {
    /// 0.0 at exit start, 1.0 when gone. `None` for live units.
    pub fn exit_progress(&self) -> Option<f32> {
        match self.state {
            VisualState::Alive => None,
            VisualState::Exiting { left } => Some(1.0 - left / EXIT_SECS),
        }
    }

    fn settled(&self) -> bool {
        match self.state {
            VisualState::Alive => self.pos == self.target && self.scale == 1.0,
            VisualState::Exiting { left } => left <= 0.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct UnitVisuals {
    visuals: HashMap<UnitId, UnitVisual>,
    /// Screen position of the center of board cell (0, 0).
    origin: (f32, f32),
    cell_w: f32,
    cell_h: f32,
}

impl UnitVisuals {
    pub fn new() -> Self {
        Self {
            visuals: HashMap::new(),
            origin: (0.0, 0.0),
            cell_w: 2.0,
            cell_h: 1.0,
        }
    }

    /// Record where the view placed the board this frame.
    pub fn set_layout(&mut self, origin: (f32, f32), cell_w: f32, cell_h: f32) {
        self.origin = origin;
        self.cell_w = cell_w;
        self.cell_h = cell_h;
    }

    pub fn board_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.origin.0 + x * self.cell_w,
            self.origin.1 + y * self.cell_h,
        )
    }

    /// Ingest this tick's board events.
    pub fn apply(&mut self, events: &[BoardEvent]) {
        for event in events {
            match *event {
                BoardEvent::UnitSpawned { id, x, y, color } => {
                    self.visuals.insert(
                        id,
                        UnitVisual {
                            color,
                            pos: (x as f32, y as f32),
                            target: (x as f32, y as f32),
                            scale: SPAWN_SCALE,
                            state: VisualState::Alive,
                        },
                    );
                }
                BoardEvent::UnitMoved { id, x, y } => {
                    if let Some(visual) = self.visuals.get_mut(&id) {
                        visual.target = (x as f32, y as f32);
                    }
                }
                BoardEvent::UnitRemoved { id } => {
                    if let Some(visual) = self.visuals.get_mut(&id) {
                        visual.state = VisualState::Exiting { left: EXIT_SECS };
                    }
                }
                BoardEvent::GameOver => {}
            }
        }
    }

    /// Advance every animation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        for visual in self.visuals.values_mut() {
            match &mut visual.state {
                VisualState::Alive => {
                    visual.pos.0 = approach(visual.pos.0, visual.target.0, MOVE_RATE, dt);
                    visual.pos.1 = approach(visual.pos.1, visual.target.1, MOVE_RATE, dt);
                    visual.scale = approach(visual.scale, 1.0, SCALE_RATE, dt);
                }
                VisualState::Exiting { left } => {
                    *left = (*left - dt).max(0.0);
                }
            }
        }
    }

    /// Drop visuals for units the board no longer tracks. Call after the
    /// tick so finished exits disappear together with their units.
    pub fn sweep(&mut self, units: &[Unit]) {
        self.visuals.retain(|id, _| units.iter().any(|u| u.id == *id));
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitVisual> {
        self.visuals.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UnitId, &UnitVisual)> {
        self.visuals.iter()
    }
}

impl Presenter for UnitVisuals {
    /// Units with no visual yet count as unsettled; their spawn event has
    /// simply not been applied yet.
    fn is_settled(&self, id: UnitId) -> bool {
        self.visuals.get(&id).is_some_and(|v| v.settled())
    }

    fn cell_to_screen(&self, x: i32, y: i32) -> (f32, f32) {
        self.board_to_screen(x as f32, y as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(visuals: &mut UnitVisuals, id: u32, x: i32, y: i32) -> UnitId {
        let id = UnitId(id);
        visuals.apply(&[BoardEvent::UnitSpawned {
            id,
            x,
            y,
            color: 0,
        }]);
        id
    }

    fn settle(visuals: &mut UnitVisuals) {
        for _ in 0..200 {
            visuals.update(0.016);
        }
    }

    #[test]
    fn test_unknown_unit_is_unsettled() {
        let visuals = UnitVisuals::new();
        assert!(!visuals.is_settled(UnitId(9)));
    }

    #[test]
    fn test_spawn_starts_small_then_settles() {
        let mut visuals = UnitVisuals::new();
        let id = spawn(&mut visuals, 1, 2, 0);
        assert!(!visuals.is_settled(id));
        assert!(visuals.get(id).unwrap().scale < 1.0);

        settle(&mut visuals);
        assert!(visuals.is_settled(id));
        assert_eq!(visuals.get(id).unwrap().scale, 1.0);
    }

    #[test]
    fn test_move_chases_target() {
        let mut visuals = UnitVisuals::new();
        let id = spawn(&mut visuals, 1, 2, 0);
        settle(&mut visuals);

        visuals.apply(&[BoardEvent::UnitMoved { id, x: 2, y: 4 }]);
        assert!(!visuals.is_settled(id));

        visuals.update(0.016);
        let pos = visuals.get(id).unwrap().pos;
        assert!(pos.1 > 0.0 && pos.1 < 4.0);

        settle(&mut visuals);
        assert_eq!(visuals.get(id).unwrap().pos, (2.0, 4.0));
        assert!(visuals.is_settled(id));
    }

    #[test]
    fn test_exit_counts_down_then_settles() {
        let mut visuals = UnitVisuals::new();
        let id = spawn(&mut visuals, 1, 2, 0);
        settle(&mut visuals);

        visuals.apply(&[BoardEvent::UnitRemoved { id }]);
        assert!(!visuals.is_settled(id));
        assert_eq!(visuals.get(id).unwrap().exit_progress(), Some(0.0));

        settle(&mut visuals);
        assert!(visuals.is_settled(id));
        assert_eq!(visuals.get(id).unwrap().exit_progress(), Some(1.0));
    }

    #[test]
    fn test_sweep_drops_unknown_ids() {
        let mut visuals = UnitVisuals::new();
        let id = spawn(&mut visuals, 1, 2, 0);
        visuals.sweep(&[]);
        assert!(visuals.get(id).is_none());
    }

    #[test]
    fn test_board_to_screen_uses_layout() {
        let mut visuals = UnitVisuals::new();
        visuals.set_layout((10.0, 5.0), 2.0, 1.0);
        assert_eq!(visuals.board_to_screen(3.0, 2.0), (16.0, 7.0));
        assert_eq!(visuals.cell_to_screen(0, 0), (10.0, 5.0));
    }
}

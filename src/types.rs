//! Core types shared across the application
//! This module contains pure data types with no external dependencies

use serde::{Deserialize, Serialize};

/// Board dimension limits
pub const MIN_BOARD_WIDTH: i32 = 2;
pub const MAX_BOARD_WIDTH: i32 = 10;
pub const DEFAULT_BOARD_WIDTH: i32 = 6;

pub const MIN_BOARD_HEIGHT: i32 = 3;
pub const MAX_BOARD_HEIGHT: i32 = 10;
pub const DEFAULT_BOARD_HEIGHT: i32 = 6;

/// Unit color limits
pub const MIN_NUM_COLORS: i32 = 3;
pub const MAX_NUM_COLORS: i32 = 7;
pub const DEFAULT_NUM_COLORS: i32 = 6;

pub const MIN_LINE_LENGTH: i32 = 3;
pub const DEFAULT_LINE_LENGTH: i32 = 3;

pub const DEFAULT_POPULATION: i32 = 0;
pub const DEFAULT_DIAGONAL: bool = true;

/// Game timing (milliseconds)
pub const TICK_MS: u32 = 16;

/// Longest possible border conveyor: 2 * MAX_W + MAX_H - 2 cells
pub const MAX_BORDER_CELLS: usize = (2 * MAX_BOARD_WIDTH + MAX_BOARD_HEIGHT - 2) as usize;

/// Stable identity of a unit for the lifetime of one board generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

/// Where a unit is in its lifecycle.
///
/// `Active` units own exactly one grid cell; `Exiting` units have already
/// been detached from the grid and only linger until their departure
/// animation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Active { x: i32, y: i32 },
    Exiting,
}

/// One playable token on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    pub id: UnitId,
    /// Index into the palette, in `[0, rules.num_colors)`.
    pub color: i32,
    pub state: UnitState,
}

/// Top-level mode of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Menu,
    Playing,
    GameOver,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Menu => "menu",
            GameMode::Playing => "playing",
            GameMode::GameOver => "gameOver",
        }
    }
}

/// Turn controller phase, observable by the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// At least one unit's visual is still catching up with its cell.
    Animating,
    /// A conveyor shift or a match fired this tick; more may follow.
    Settling,
    /// Board is quiescent and accepts input.
    Idle,
    GameOver,
}

/// Board rule parameters. One value of this type fully describes a game
/// variant; changing any field discards the board and builds a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub width: i32,
    pub height: i32,
    pub num_colors: i32,
    pub initial_population: i32,
    pub line_length: i32,
    pub diagonal: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            num_colors: DEFAULT_NUM_COLORS,
            initial_population: DEFAULT_POPULATION,
            line_length: DEFAULT_LINE_LENGTH,
            diagonal: DEFAULT_DIAGONAL,
        }
    }
}

impl Rules {
    /// Initial population is capped at half the interior cells.
    pub fn max_initial_population(&self) -> i32 {
        (self.height - 2) * (self.width - 1) / 2
    }

    pub fn max_line_length(&self) -> i32 {
        self.width.max(self.height)
    }

    /// Return a copy with every field pinned into its legal range.
    ///
    /// Population and line length depend on the dimensions, so they are
    /// clamped after width and height.
    pub fn clamped(&self) -> Self {
        let mut r = *self;
        r.width = r.width.clamp(MIN_BOARD_WIDTH, MAX_BOARD_WIDTH);
        r.height = r.height.clamp(MIN_BOARD_HEIGHT, MAX_BOARD_HEIGHT);
        r.num_colors = r.num_colors.clamp(MIN_NUM_COLORS, MAX_NUM_COLORS);
        r.initial_population = r.initial_population.clamp(0, r.max_initial_population());
        r.line_length = r.line_length.clamp(MIN_LINE_LENGTH, r.max_line_length());
        r
    }

    /// Canonical key for the best-score table. Stable and unique per rule
    /// combination, e.g. `w6h6c6p0l3d1`.
    pub fn mode_string(&self) -> String {
        format!(
            "w{}h{}c{}p{}l{}d{}",
            self.width,
            self.height,
            self.num_colors,
            self.initial_population,
            self.line_length,
            self.diagonal as i32
        )
    }
}

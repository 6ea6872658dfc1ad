//! Core module - pure rule logic with no I/O dependencies
//!
//! Everything in here is deterministic given a seed and an input stream,
//! which is what makes the rule engine unit-testable without a terminal.

pub mod board;
pub mod border;
pub mod game;
pub mod grid;
pub mod matching;
pub mod rng;
pub mod select;

// Re-export the types frontends actually touch.
pub use board::{Board, BoardEvent};
pub use game::{Game, Presenter, Session, TickInput};
pub use grid::Grid;
pub use rng::SimpleRng;

//! Ringline: a conveyor-belt color matching puzzle for the terminal.
//!
//! The playfield is a grid whose border acts as a moving queue of colored
//! units. Clicking a border cell pushes its unit into the playfield; the
//! queue closes ranks and refills from the tail. Runs of equal colors at
//! least `line_length` long disappear and score one point per unit, and
//! removals cascade until the board is quiescent.
//!
//! `core` is pure and deterministic; `term` renders it into a terminal
//! framebuffer and feeds pointer input back in.

pub mod config;
pub mod core;
pub mod term;
pub mod types;

//! Terminal frontend.
//!
//! A small game-style pipeline instead of a widget toolkit: views draw
//! into a framebuffer, the renderer diffs it onto the terminal, and the
//! animation layer doubles as the engine's presenter.

pub mod anim;
pub mod fb;
pub mod game_view;
pub mod renderer;

pub use anim::UnitVisuals;
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Layout, MenuState, Viewport};
pub use renderer::TerminalRenderer;

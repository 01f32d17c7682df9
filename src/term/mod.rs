//! Terminal rendering module
//!
//! A small game-oriented pipeline: the view draws the world into a
//! plain framebuffer, and the renderer flushes that to the terminal.
//! Keeping the two apart leaves every layout decision unit-testable.

pub mod fb;
pub mod renderer;
pub mod view;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::TerminalRenderer;
pub use view::GameView;

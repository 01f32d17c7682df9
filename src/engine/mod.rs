//! Engine module - wires the simulation together
//!
//! Configuration, the component registry, the shared world and the round
//! driver that steps everything at a fixed cadence.

pub mod config;
pub mod registry;
pub mod round;
pub mod world;

// Re-export commonly used types
pub use config::{ConfigError, CorpusMode, RoundConfig};
pub use registry::{Component, ControlError, Controllable, Registry, Renderable, Updatable};
pub use round::Round;
pub use world::{PieceStore, World};

//! Core module - game rules and simulation logic
//!
//! Board storage, piece mechanics, the upcoming-piece queue, spawning,
//! line clearing, scoring and placement prediction.

pub mod board;
pub mod clear;
pub mod control;
pub mod piece;
pub mod predict;
pub mod queue;
pub mod rng;
pub mod score;
pub mod shape;
pub mod spawn;

// Re-export commonly used types
pub use board::Board;
pub use clear::LineClearer;
pub use control::Controller;
pub use piece::Tetromino;
pub use predict::{PredictError, Predictor, Suggestion};
pub use queue::PieceQueue;
pub use rng::SimpleRng;
pub use score::{ScoreState, Scoreboard};
pub use spawn::Spawner;

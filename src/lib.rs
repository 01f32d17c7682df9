//! Gridfall: a falling-block grid simulation with a self-training
//! placement predictor.
//!
//! `core` holds the board, piece mechanics, scoring and prediction;
//! `engine` wires those into a component registry driven by a fixed
//! tick; `corpus` persists accepted placements between rounds; `input`
//! and `term` are the terminal front end.

pub mod core;
pub mod corpus;
pub mod engine;
pub mod input;
pub mod term;
pub mod types;

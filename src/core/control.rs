//! Controller - applies the tick's input batch to the active piece
//!
//! Translation, rotation and hard drop all validate through the piece's
//! own collision probe; a blocked action is simply dropped. Invoking the
//! controller with no falling piece yields `NoActiveTarget`, which the
//! registry treats as routine.

use std::any::Any;

use crate::engine::registry::{Component, ControlError, Controllable};
use crate::engine::world::World;
use crate::types::GameAction;

#[derive(Default)]
pub struct Controller;

impl Controller {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Controller {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Controllable for Controller {
    fn control(&mut self, world: &mut World, actions: &[GameAction]) -> Result<(), ControlError> {
        let World { board, pieces, .. } = world;
        let piece = pieces.active_mut().ok_or(ControlError::NoActiveTarget)?;
        for action in actions {
            match action {
                GameAction::MoveLeft => {
                    piece.shift(board, -1, 0);
                }
                GameAction::MoveRight => {
                    piece.shift(board, 1, 0);
                }
                GameAction::MoveDown => {
                    piece.shift(board, 0, 1);
                }
                GameAction::HardDrop => piece.hard_drop(board),
                GameAction::RotateCw => {
                    piece.rotate_cw(board);
                }
                GameAction::RotateCcw => {
                    piece.rotate_ccw(board);
                }
            }
        }
        Ok(())
    }
}

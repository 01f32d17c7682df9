//! Component registry - capability-keyed dispatch
//!
//! Components register under the capability traits they implement and the
//! round loop walks each list in registration order, which is the only
//! ordering guarantee components may rely on. `query` recovers a concrete
//! component by type for direct access outside the tick path.

use std::any::Any;
use std::fmt;

use crate::engine::world::World;
use crate::term::fb::FrameBuffer;
use crate::types::GameAction;

/// Base trait every registered component implements by hand, exposing the
/// concrete type for `Registry::query` downcasts.
pub trait Component: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Per-tick simulation step.
pub trait Updatable: Component {
    fn update(&mut self, world: &mut World, now_ms: u64);
}

/// Per-tick input consumption.
pub trait Controllable: Component {
    fn control(&mut self, world: &mut World, actions: &[GameAction]) -> Result<(), ControlError>;
}

/// Per-frame drawing into the frame buffer.
pub trait Renderable: Component {
    fn render(&self, world: &World, fb: &mut FrameBuffer);
}

/// Control failures that must never abort the tick loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// Input arrived while no piece was falling.
    NoActiveTarget,
}

impl ControlError {
    pub fn code(&self) -> &'static str {
        match self {
            ControlError::NoActiveTarget => "no_active_target",
        }
    }
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::NoActiveTarget => write!(f, "no active piece to control"),
        }
    }
}

impl std::error::Error for ControlError {}

/// Capability lists, iterated in registration order.
#[derive(Default)]
pub struct Registry {
    updatables: Vec<Box<dyn Updatable>>,
    controllables: Vec<Box<dyn Controllable>>,
    renderables: Vec<Box<dyn Renderable>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_updatable(&mut self, component: Box<dyn Updatable>) {
        self.updatables.push(component);
    }

    pub fn register_controllable(&mut self, component: Box<dyn Controllable>) {
        self.controllables.push(component);
    }

    pub fn register_renderable(&mut self, component: Box<dyn Renderable>) {
        self.renderables.push(component);
    }

    /// Run every updatable in registration order.
    pub fn update_all(&mut self, world: &mut World, now_ms: u64) {
        for component in &mut self.updatables {
            component.update(world, now_ms);
        }
    }

    /// Feed the tick's input batch to every controllable.
    pub fn control_all(&mut self, world: &mut World, actions: &[GameAction]) {
        for component in &mut self.controllables {
            if let Err(ControlError::NoActiveTarget) = component.control(world, actions) {
                // Expected between a landing and the next spawn.
            }
        }
    }

    /// Draw every renderable in registration order.
    pub fn render_all(&self, world: &World, fb: &mut FrameBuffer) {
        for component in &self.renderables {
            component.render(world, fb);
        }
    }

    /// First registered component of concrete type `T`.
    pub fn query<T: Component>(&self) -> Option<&T> {
        self.updatables
            .iter()
            .map(|c| c.as_any())
            .chain(self.controllables.iter().map(|c| c.as_any()))
            .chain(self.renderables.iter().map(|c| c.as_any()))
            .find_map(|any| any.downcast_ref::<T>())
    }

    pub fn query_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.updatables
            .iter_mut()
            .map(|c| c.as_any_mut())
            .chain(self.controllables.iter_mut().map(|c| c.as_any_mut()))
            .chain(self.renderables.iter_mut().map(|c| c.as_any_mut()))
            .find_map(|any| any.downcast_mut::<T>())
    }
}

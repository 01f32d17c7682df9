//! Round driver.
//!
//! Builds the world from a [`RoundConfig`], registers the simulation
//! components and steps them in a fixed order: gravity, updates
//! (spawn, clear, score), then the tick's input batch. Rendering is a
//! separate pass so headless callers can skip it entirely.

use std::time::Instant;

use anyhow::Result;

use crate::core::board::Board;
use crate::core::clear::LineClearer;
use crate::core::control::Controller;
use crate::core::predict::Predictor;
use crate::core::queue::PieceQueue;
use crate::core::rng::SimpleRng;
use crate::core::score::Scoreboard;
use crate::core::spawn::Spawner;
use crate::corpus::{current_timestamp_ms, CorpusStore, PersistHandle};
use crate::engine::config::{CorpusMode, RoundConfig};
use crate::engine::registry::{Registry, Renderable};
use crate::engine::world::World;
use crate::term::fb::FrameBuffer;
use crate::types::GameAction;

pub struct Round {
    world: World,
    registry: Registry,
    started_at: Instant,
}

impl Round {
    pub fn new(config: &RoundConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| current_timestamp_ms() as u32);
        let board = Board::new(config.columns, config.rows);
        let queue = PieceQueue::new(config.queue_lookahead, SimpleRng::new(seed));
        let world = World::new(board, queue);

        let predictor = Predictor::new(corpus_store(config)?);
        let spawner = Spawner::new(
            config.gravity_ms,
            config.spawn_override,
            SimpleRng::new(seed.wrapping_add(1)),
            predictor,
        );

        let mut registry = Registry::new();
        registry.register_updatable(Box::new(spawner));
        registry.register_updatable(Box::new(LineClearer::new()));
        registry.register_updatable(Box::new(Scoreboard::new(config.combo_window_ms)));
        registry.register_controllable(Box::new(Controller::new()));

        Ok(Self {
            world,
            registry,
            started_at: Instant::now(),
        })
    }

    /// Milliseconds since the round started.
    pub fn now_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    /// One simulation step at `now_ms` with this tick's input batch.
    pub fn tick(&mut self, actions: &[GameAction], now_ms: u64) {
        self.world.apply_gravity(now_ms);
        self.registry.update_all(&mut self.world, now_ms);
        self.registry.control_all(&mut self.world, actions);
    }

    pub fn render(&self, fb: &mut FrameBuffer) {
        self.registry.render_all(&self.world, fb);
    }

    pub fn register_renderable(&mut self, component: Box<dyn Renderable>) {
        self.registry.register_renderable(component);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }
}

fn corpus_store(config: &RoundConfig) -> Result<CorpusStore> {
    Ok(match config.corpus_mode {
        CorpusMode::Memory => CorpusStore::Memory,
        CorpusMode::File => CorpusStore::File(config.corpus_path.clone()),
        CorpusMode::Background => {
            CorpusStore::Background(PersistHandle::start(config.corpus_path.clone())?)
        }
    })
}

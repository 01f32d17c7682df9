//! Scoring module - classic line points with a combo window
//!
//! Points: 1 row = 100, 2 = 300, 3 = 500, 4 = 800; larger clears fall back
//! to `count * 100`. Each clearing tick extends a combo chain worth
//! `1 + (combo - 1) * 0.5` times the base, floored. A clear-free tick
//! drains the combo timer and the chain only resets once the timer has
//! fully elapsed. Level is `1 + total_lines / 10`.

use std::any::Any;

use crate::engine::registry::{Component, Updatable};
use crate::engine::world::World;
use crate::types::DEFAULT_COMBO_WINDOW_MS;

/// Base points for a simultaneous clear of `lines` rows.
pub fn base_points(lines: u32) -> u32 {
    match lines {
        0 => 0,
        1 => 100,
        2 => 300,
        3 => 500,
        4 => 800,
        n => n.saturating_mul(100),
    }
}

/// Base points scaled by the combo multiplier `1 + (combo - 1) * 0.5`,
/// computed exactly as `base * (combo + 1) / 2` and floored.
pub fn combo_points(base: u32, combo: u32) -> u32 {
    let chain = combo.max(1);
    base.saturating_mul(chain.saturating_add(1)) / 2
}

/// Level for a running total of cleared lines.
pub fn level_for(total_lines: u32) -> u32 {
    1 + total_lines / 10
}

/// Score, level and combo state, owned by the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreState {
    pub score: u32,
    pub level: u32,
    pub total_lines: u32,
    pub combo: u32,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            total_lines: 0,
            combo: 0,
        }
    }
}

impl ScoreState {
    /// Fold a clear of `lines` rows into the running state and return the
    /// points awarded.
    pub fn apply_clear(&mut self, lines: u32) -> u32 {
        if lines == 0 {
            return 0;
        }
        self.combo = self.combo.saturating_add(1);
        let points = combo_points(base_points(lines), self.combo);
        self.score = self.score.saturating_add(points);
        self.total_lines = self.total_lines.saturating_add(lines);
        self.level = level_for(self.total_lines);
        points
    }
}

/// Component that consumes the world's cleared-row counter each tick and
/// runs the combo cooldown.
pub struct Scoreboard {
    window_ms: u64,
    timer_ms: i64,
    last_update_ms: u64,
}

impl Scoreboard {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            timer_ms: 0,
            last_update_ms: 0,
        }
    }
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new(DEFAULT_COMBO_WINDOW_MS)
    }
}

impl Component for Scoreboard {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Updatable for Scoreboard {
    fn update(&mut self, world: &mut World, now_ms: u64) {
        let elapsed = now_ms.saturating_sub(self.last_update_ms);
        self.last_update_ms = now_ms;

        let lines = world.cleared_rows;
        if lines > 0 {
            world.cleared_rows = 0;
            world.score.apply_clear(lines);
            self.timer_ms = self.window_ms as i64;
        } else if self.timer_ms > 0 {
            self.timer_ms -= elapsed as i64;
        } else {
            world.score.combo = 0;
        }
    }
}

//! Round configuration with environment overrides.

use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::types::{
    Coord, DEFAULT_COLUMNS, DEFAULT_COMBO_WINDOW_MS, DEFAULT_GRAVITY_MS, DEFAULT_QUEUE_LOOKAHEAD,
    DEFAULT_ROWS, MAX_QUEUE_LOOKAHEAD,
};

/// How accepted placements are persisted between rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusMode {
    /// Keep records in memory only; nothing touches disk.
    Memory,
    /// Rewrite the corpus file synchronously on every accepted placement.
    File,
    /// Hand writes to a background worker (default).
    Background,
}

/// Why a [`RoundConfig`] was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    BoardTooSmall { columns: i16, rows: i16 },
    ZeroGravity,
    LookaheadOutOfRange { lookahead: usize },
    SpawnOutOfBounds { x: i16, y: i16 },
}

impl ConfigError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::BoardTooSmall { .. } => "board_too_small",
            ConfigError::ZeroGravity => "zero_gravity",
            ConfigError::LookaheadOutOfRange { .. } => "lookahead_out_of_range",
            ConfigError::SpawnOutOfBounds { .. } => "spawn_out_of_bounds",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BoardTooSmall { columns, rows } => {
                write!(f, "board {}x{} too small, both sides must be at least 4", columns, rows)
            }
            ConfigError::ZeroGravity => write!(f, "gravity interval must be positive"),
            ConfigError::LookaheadOutOfRange { lookahead } => {
                write!(f, "queue lookahead {} outside 1..={}", lookahead, MAX_QUEUE_LOOKAHEAD)
            }
            ConfigError::SpawnOutOfBounds { x, y } => {
                write!(f, "spawn override ({}, {}) leaves the board", x, y)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Tunables for one round.
///
/// `from_env` reads `GRIDFALL_*` variables; unset or unparsable values
/// fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundConfig {
    pub columns: i16,
    pub rows: i16,
    /// Milliseconds between gravity steps.
    pub gravity_ms: u64,
    /// Upcoming-piece lookahead, 1..=[`MAX_QUEUE_LOOKAHEAD`].
    pub queue_lookahead: usize,
    /// Combo cooldown window in milliseconds.
    pub combo_window_ms: u64,
    pub corpus_mode: CorpusMode,
    pub corpus_path: PathBuf,
    /// Fixed RNG seed; `None` seeds from the clock.
    pub seed: Option<u32>,
    /// Pin every spawn to one origin instead of a random column.
    pub spawn_override: Option<Coord>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            gravity_ms: DEFAULT_GRAVITY_MS,
            queue_lookahead: DEFAULT_QUEUE_LOOKAHEAD,
            combo_window_ms: DEFAULT_COMBO_WINDOW_MS,
            corpus_mode: CorpusMode::Background,
            corpus_path: PathBuf::from("gridfall_corpus.json"),
            seed: None,
            spawn_override: None,
        }
    }
}

impl RoundConfig {
    /// Create from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let columns = env::var("GRIDFALL_COLUMNS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.columns);
        let rows = env::var("GRIDFALL_ROWS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.rows);
        let gravity_ms = env::var("GRIDFALL_GRAVITY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.gravity_ms);
        let queue_lookahead = env::var("GRIDFALL_LOOKAHEAD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.queue_lookahead);
        let combo_window_ms = env::var("GRIDFALL_COMBO_WINDOW_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.combo_window_ms);

        let corpus_mode = match env::var("GRIDFALL_CORPUS_MODE") {
            Ok(mode) => match mode.trim().to_ascii_lowercase().as_str() {
                "memory" => CorpusMode::Memory,
                "file" => CorpusMode::File,
                _ => CorpusMode::Background,
            },
            Err(_) => defaults.corpus_mode,
        };
        let corpus_path = env::var("GRIDFALL_CORPUS")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.corpus_path);

        let seed = env::var("GRIDFALL_SEED").ok().and_then(|s| s.parse().ok());

        let spawn_x = env::var("GRIDFALL_SPAWN_X").ok().and_then(|s| s.parse().ok());
        let spawn_y = env::var("GRIDFALL_SPAWN_Y").ok().and_then(|s| s.parse().ok());
        let spawn_override = match (spawn_x, spawn_y) {
            (Some(x), Some(y)) => Some((x, y)),
            (Some(x), None) => Some((x, 0)),
            _ => None,
        };

        Self {
            columns,
            rows,
            gravity_ms,
            queue_lookahead,
            combo_window_ms,
            corpus_mode,
            corpus_path,
            seed,
            spawn_override,
        }
    }

    /// Reject configurations the simulation cannot host.
    ///
    /// Every piece orientation spans at most 4 cells per axis, so both board
    /// sides must be at least 4 and a pinned spawn must leave 4 rows below it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < 4 || self.rows < 4 {
            return Err(ConfigError::BoardTooSmall {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.gravity_ms == 0 {
            return Err(ConfigError::ZeroGravity);
        }
        if self.queue_lookahead == 0 || self.queue_lookahead > MAX_QUEUE_LOOKAHEAD {
            return Err(ConfigError::LookaheadOutOfRange {
                lookahead: self.queue_lookahead,
            });
        }
        if let Some((x, y)) = self.spawn_override {
            if x < 0 || x >= self.columns || y < 0 || y > self.rows - 4 {
                return Err(ConfigError::SpawnOutOfBounds { x, y });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RoundConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.columns, 10);
        assert_eq!(config.rows, 20);
        assert_eq!(config.corpus_mode, CorpusMode::Background);
    }

    #[test]
    fn test_rejects_board_too_small_for_any_piece() {
        let config = RoundConfig {
            columns: 3,
            ..RoundConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), "board_too_small");

        let config = RoundConfig {
            rows: 2,
            ..RoundConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_gravity_interval() {
        let config = RoundConfig {
            gravity_ms: 0,
            ..RoundConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().code(), "zero_gravity");
    }

    #[test]
    fn test_rejects_lookahead_outside_bounds() {
        let config = RoundConfig {
            queue_lookahead: 0,
            ..RoundConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().code(), "lookahead_out_of_range");

        let config = RoundConfig {
            queue_lookahead: MAX_QUEUE_LOOKAHEAD + 1,
            ..RoundConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_spawn_override_must_leave_room_below() {
        let mut config = RoundConfig {
            spawn_override: Some((4, 16)),
            ..RoundConfig::default()
        };
        assert!(config.validate().is_ok());

        config.spawn_override = Some((4, 17));
        assert_eq!(config.validate().unwrap_err().code(), "spawn_out_of_bounds");

        config.spawn_override = Some((10, 0));
        assert!(config.validate().is_err());

        config.spawn_override = Some((-1, 0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_env() {
        // This test just ensures it doesn't panic
        let _config = RoundConfig::from_env();
    }

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = ConfigError::BoardTooSmall { columns: 3, rows: 20 };
        assert!(err.to_string().contains("3x20"));

        let err = ConfigError::SpawnOutOfBounds { x: 12, y: 0 };
        assert!(err.to_string().contains("(12, 0)"));
    }
}

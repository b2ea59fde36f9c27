//! Level catalog
//!
//! A static, ordered registry of level definitions. The catalog is immutable
//! for the life of the process; completion state lives in the progress record
//! (`crate::progress`), never on the catalog entries themselves.

use crate::core::config::{GRID_MAX, GRID_MIN};
use crate::core::error::{GameError, Result};
use serde::{Deserialize, Serialize};

/// A single level: board size and the accuracy required to complete it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// 1-based level number, also the unlock order
    pub number: u32,
    /// Accuracy percentage in [0, 100] the play-through must EXCEED
    pub required_score: f64,
    /// Board edge length, in [GRID_MIN, GRID_MAX]
    pub grid_size: usize,
}

/// Ordered, read-only registry of levels
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
}

impl LevelCatalog {
    /// The shipped level progression
    pub fn builtin() -> Self {
        Self {
            levels: vec![
                LevelDefinition { number: 1, required_score: 5.0, grid_size: 3 },
                LevelDefinition { number: 2, required_score: 8.0, grid_size: 4 },
                LevelDefinition { number: 3, required_score: 10.0, grid_size: 4 },
                LevelDefinition { number: 4, required_score: 12.0, grid_size: 5 },
                LevelDefinition { number: 5, required_score: 15.0, grid_size: 5 },
            ],
        }
    }

    /// Build a catalog from explicit definitions, validating numbering and sizes
    pub fn new(levels: Vec<LevelDefinition>) -> Result<Self> {
        for (i, level) in levels.iter().enumerate() {
            if level.number != i as u32 + 1 {
                return Err(GameError::UnknownLevel(level.number));
            }
            if level.grid_size < GRID_MIN || level.grid_size > GRID_MAX {
                return Err(GameError::InvalidConfig(format!(
                    "level {} grid size {} outside {}..={}",
                    level.number, level.grid_size, GRID_MIN, GRID_MAX
                )));
            }
            if !(0.0..=100.0).contains(&level.required_score) {
                return Err(GameError::InvalidConfig(format!(
                    "level {} required score {} outside 0..=100",
                    level.number, level.required_score
                )));
            }
        }
        Ok(Self { levels })
    }

    /// All levels, in order
    pub fn all(&self) -> &[LevelDefinition] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Look up a level by its 1-based number
    pub fn get(&self, number: u32) -> Result<&LevelDefinition> {
        if number == 0 {
            return Err(GameError::UnknownLevel(number));
        }
        self.levels
            .get(number as usize - 1)
            .ok_or(GameError::UnknownLevel(number))
    }
}

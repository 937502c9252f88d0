//! Simulation error types
//!
//! Only construction-time failures are errors. Running out of room during
//! play is reported through `Option` and handled by the caller.

use thiserror::Error;

/// Errors raised while building levels, snakes, or rounds
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: i32, height: i32 },
    #[error("level data holds {actual} cells but the grid only has {expected}")]
    LevelData { expected: usize, actual: usize },
    #[error("obstacle range {min}..={max} is empty")]
    ObstacleRange { min: u32, max: u32 },
    #[error("no level preset {0}")]
    UnknownPreset(usize),
    #[error("unknown cell tag {0}")]
    UnknownCell(u8),
    #[error("a snake needs at least 2 segments, got {0}")]
    SnakeTooShort(usize),
    #[error("no clear run of cells left to place the snake")]
    NoRoomForSnake,
    #[error("no clear cell left to place food")]
    NoRoomForFood,
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied wall-clock milliseconds only
//! - Seeded RNG only
//! - No rendering, audio or DOM dependencies

pub mod error;
pub mod food;
pub mod grid;
pub mod levelgen;
pub mod movement;
pub mod phase;
pub mod round;
pub mod schedule;
pub mod snake;

pub use error::SimError;
pub use food::{Food, FoodKind};
pub use grid::{Cell, Level};
pub use levelgen::LevelParams;
pub use movement::StepOutcome;
pub use phase::{Banner, Game, GameConfig, GamePhase};
pub use round::{AudioCue, GameEvent, Round, RoundConfig};
pub use schedule::{FrameLoop, FrameToken, Ticker};
pub use snake::{DeathCause, Direction, Snake};

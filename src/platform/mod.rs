//! Platform abstraction layer
//!
//! Interfaces the simulation needs from its host:
//! - Keyboard state queries
//! - Wall-clock time

pub mod input;
pub mod time;

pub use input::{Key, KeyInput, Keyboard};
pub use time::{Clock, ManualClock, SystemClock};

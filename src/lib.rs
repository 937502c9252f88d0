//! Wrap Snake - a snake arcade game on a toroidal grid
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level generation, movement, food, game phases)
//! - `platform`: Host collaborator interfaces (keyboard queries, clocks)
//! - `settings`: Tunable game configuration
//! - `view`: Read-only snapshot consumed by renderers

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod view;

pub use settings::{Settings, SettingsError};
pub use view::GameView;

/// Game configuration constants
pub mod consts {
    /// Real time between periodic movement ticks
    pub const TICK_INTERVAL_MS: u64 = 200;
    /// Minimum hold time before a key press may leave a waiting phase
    pub const DEBOUNCE_MS: u64 = 500;

    /// How long a piece of food stays on the grid
    pub const FOOD_LIFETIME_MS: u64 = 15_000;
    /// Score lost when food expires uneaten
    pub const EXPIRY_PENALTY: u32 = 3;
    /// Number of food kinds; kind `k` is worth `(k + 1) * 2` points
    pub const FOOD_KINDS: u8 = 3;

    /// Default grid dimensions (cells)
    pub const GRID_WIDTH: i32 = 30;
    pub const GRID_HEIGHT: i32 = 30;
    /// Pixel size of one cell for renderers
    pub const CELL_SIZE: u32 = 15;

    /// Random rounds lay between 3 and 7 lethal obstacle lines
    pub const MIN_OBSTACLES: u32 = 3;
    pub const MAX_OBSTACLES: u32 = 7;
    /// Obstacle seeds keep this many cells away from every edge
    pub const OBSTACLE_MARGIN: i32 = 3;
    /// Obstacle lines are between 3 and 7 cells long
    pub const OBSTACLE_MIN_LEN: i32 = 3;
    pub const OBSTACLE_MAX_LEN: i32 = 7;
}

/// Wrap a coordinate onto `[0, extent)`
///
/// The snake only ever moves one cell per step, so a single overflow in
/// either direction is the only case that occurs, but any offset is handled.
#[inline]
pub fn wrap_coord(value: i32, extent: i32) -> i32 {
    value.rem_euclid(extent)
}

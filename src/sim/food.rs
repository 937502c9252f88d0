//! Food placement and lifetime
//!
//! Food ages only while the round is active: the controller feeds it the
//! active time of each frame, so a pause simply stops the clock.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{FOOD_KINDS, FOOD_LIFETIME_MS};

/// Food variants, worth progressively more points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FoodKind {
    #[default]
    Small,
    Medium,
    Large,
}

impl FoodKind {
    pub const ALL: [FoodKind; FOOD_KINDS as usize] =
        [FoodKind::Small, FoodKind::Medium, FoodKind::Large];

    pub fn index(self) -> u32 {
        match self {
            FoodKind::Small => 0,
            FoodKind::Medium => 1,
            FoodKind::Large => 2,
        }
    }

    /// Score awarded when eaten
    pub fn points(self) -> u32 {
        (self.index() + 1) * 2
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Whether food of the given active age has outlived its lifetime
#[inline]
pub fn expired(age_ms: u64, lifetime_ms: u64) -> bool {
    age_ms >= lifetime_ms
}

/// The single live food item of a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub position: IVec2,
    pub kind: FoodKind,
    pub lifetime_ms: u64,
    /// Active time elapsed since placement
    age_ms: u64,
}

impl Default for Food {
    fn default() -> Self {
        Self::new(FOOD_LIFETIME_MS)
    }
}

impl Food {
    /// Unplaced food at the origin
    pub fn new(lifetime_ms: u64) -> Self {
        Self {
            position: IVec2::ZERO,
            kind: FoodKind::Small,
            lifetime_ms,
            age_ms: 0,
        }
    }

    /// Replace the food with a fresh item
    pub fn init(&mut self, position: IVec2, kind: FoodKind) {
        self.position = position;
        self.kind = kind;
        self.age_ms = 0;
    }

    /// Add active time
    pub fn advance(&mut self, dt_ms: u64) {
        self.age_ms = self.age_ms.saturating_add(dt_ms);
    }

    pub fn age_ms(&self) -> u64 {
        self.age_ms
    }

    pub fn is_expired(&self) -> bool {
        expired(self.age_ms, self.lifetime_ms)
    }

    /// Fraction of the lifetime used up, in `[0, 1]`
    pub fn age_fraction(&self) -> f32 {
        if self.lifetime_ms == 0 {
            return 1.0;
        }
        (self.age_ms as f32 / self.lifetime_ms as f32).min(1.0)
    }
}

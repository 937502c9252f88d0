//! One round of play: the level, snake and food triple
//!
//! A round owns its RNG so every placement is reproducible from the seed,
//! and queues events for the host instead of talking to audio directly.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::food::{Food, FoodKind};
use super::grid::Level;
use super::levelgen::LevelParams;
use super::movement::{self, StepOutcome};
use super::snake::{Direction, Snake};
use crate::consts::*;

/// Sound cues fired by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    Pickup,
    Death,
    Thump,
}

impl AudioCue {
    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Pickup => "pickup",
            AudioCue::Death => "death",
            AudioCue::Thump => "thump",
        }
    }
}

/// Fire-and-forget notifications for host collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Cue(AudioCue),
    /// Background music should stop (pause or death)
    MusicPaused,
    /// Background music should continue
    MusicResumed,
}

/// Everything needed to build a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub width: i32,
    pub height: i32,
    pub cell_size: u32,
    pub outer_walls: bool,
    pub min_obstacles: u32,
    pub max_obstacles: u32,
    pub food_lifetime_ms: u64,
    pub expiry_penalty: u32,
    /// Index into [`LevelParams::PRESETS`]; `None` rolls a random level
    #[serde(default)]
    pub preset: Option<usize>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            cell_size: CELL_SIZE,
            outer_walls: true,
            min_obstacles: MIN_OBSTACLES,
            max_obstacles: MAX_OBSTACLES,
            food_lifetime_ms: FOOD_LIFETIME_MS,
            expiry_penalty: EXPIRY_PENALTY,
            preset: None,
        }
    }
}

/// Live state of a single round
#[derive(Debug, Clone)]
pub struct Round {
    pub level: Level,
    pub snake: Snake,
    pub food: Food,
    expiry_penalty: u32,
    rng: Pcg32,
    events: Vec<GameEvent>,
    /// Food was placed by a step since the last `age_food`
    fresh_food: bool,
}

impl Round {
    /// Generate a level and place the snake and the first food
    pub fn new(config: &RoundConfig, seed: u64) -> Result<Self, SimError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let params = match config.preset {
            Some(index) => LevelParams::preset(index)?,
            None => LevelParams::rolled(
                config.width,
                config.height,
                config.outer_walls,
                config.min_obstacles,
                config.max_obstacles,
                &mut rng,
            )?,
        };
        let level = params.generate(&mut rng)?.with_cell_size(config.cell_size);

        let snake = place_snake(&level, &mut rng)?;
        let mut round = Self {
            level,
            snake,
            food: Food::new(config.food_lifetime_ms),
            expiry_penalty: config.expiry_penalty,
            rng,
            events: Vec::new(),
            fresh_food: false,
        };
        if !round.replace_food() {
            return Err(SimError::NoRoomForFood);
        }

        log::info!(
            "Round ready: {}x{} grid, {} obstacle lines, seed {}",
            params.width,
            params.height,
            params.obstacles,
            seed
        );
        Ok(round)
    }

    /// Assemble a round from prepared parts
    pub fn from_parts(
        level: Level,
        snake: Snake,
        food: Food,
        expiry_penalty: u32,
        seed: u64,
    ) -> Self {
        Self {
            level,
            snake,
            food,
            expiry_penalty,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            fresh_food: false,
        }
    }

    /// One movement tick
    pub fn step(&mut self) -> StepOutcome {
        let len = self.snake.len();
        let outcome = movement::step(
            &mut self.snake,
            &self.level,
            &mut self.food,
            &mut self.rng,
            &mut self.events,
        );
        self.note_growth(len);
        outcome
    }

    /// Steer; a valid turn takes an immediate step
    pub fn set_direction(&mut self, direction: Direction) -> Option<StepOutcome> {
        let len = self.snake.len();
        let outcome = movement::set_direction(
            &mut self.snake,
            direction,
            &self.level,
            &mut self.food,
            &mut self.rng,
            &mut self.events,
        );
        self.note_growth(len);
        outcome
    }

    /// A pickup re-placed the food, whose lifetime starts now
    fn note_growth(&mut self, len_before: usize) {
        if self.snake.len() > len_before {
            self.fresh_food = true;
        }
    }

    /// Age the food by `dt_ms` of active time and replace it if it expired
    ///
    /// Food placed by a step since the previous call did not exist for the
    /// earlier part of `dt_ms`, so it is not aged this time. Returns true when
    /// expired food was replaced. If the grid has no room, nothing changes and
    /// the expiry is retried on the next call.
    pub fn age_food(&mut self, dt_ms: u64) -> bool {
        if std::mem::take(&mut self.fresh_food) {
            return false;
        }
        self.food.advance(dt_ms);
        if !self.food.is_expired() {
            return false;
        }
        if !self.replace_food() {
            return false;
        }
        self.snake.penalize(self.expiry_penalty);
        log::debug!("Food expired, score now {}", self.snake.score());
        true
    }

    /// Put fresh food on a clear cell off the snake
    fn replace_food(&mut self) -> bool {
        let snake = &self.snake;
        match self.level.empty_cell_by(&mut self.rng, |p| snake.occupies(p)) {
            Some(pos) => {
                let kind = FoodKind::random(&mut self.rng);
                self.food.init(pos, kind);
                true
            }
            None => false,
        }
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}

/// Find a clear cell with two clear cells to its right and lay the snake
/// there heading right
fn place_snake<R: Rng>(level: &Level, rng: &mut R) -> Result<Snake, SimError> {
    for _ in 0..level.len() {
        let Some(tail) = level.empty_cell(rng, &[]) else {
            break;
        };
        let head = level.wrap(tail + IVec2::X);
        let ahead = level.wrap(tail + IVec2::X * 2);
        if level.cell(head).is_clear() && level.cell(ahead).is_clear() {
            return Snake::from_segments([head, tail], Direction::Right);
        }
    }
    Err(SimError::NoRoomForSnake)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Cell;

    #[test]
    fn test_new_round_is_consistent() {
        let config = RoundConfig::default();
        for seed in 0..20 {
            let round = Round::new(&config, seed).unwrap();
            assert_eq!(round.snake.len(), 2);
            assert_eq!(round.snake.direction, Direction::Right);
            for seg in round.snake.segments() {
                assert!(round.level.cell(*seg).is_clear());
            }
            let ahead = round.level.wrap(round.snake.head() + IVec2::X);
            assert!(round.level.cell(ahead).is_clear());
            assert!(round.level.cell(round.food.position).is_clear());
            assert!(!round.snake.occupies(round.food.position));
            assert_eq!(round.level.cell_size(), CELL_SIZE);
        }
    }

    #[test]
    fn test_same_seed_same_round() {
        let config = RoundConfig::default();
        let a = Round::new(&config, 1234).unwrap();
        let b = Round::new(&config, 1234).unwrap();
        assert_eq!(a.level, b.level);
        assert_eq!(a.snake, b.snake);
        assert_eq!(a.food, b.food);
    }

    #[test]
    fn test_bad_level_config_is_an_error() {
        let inverted = RoundConfig {
            min_obstacles: 5,
            max_obstacles: 2,
            ..RoundConfig::default()
        };
        assert_eq!(
            Round::new(&inverted, 1).err(),
            Some(SimError::ObstacleRange { min: 5, max: 2 })
        );

        let missing = RoundConfig {
            preset: Some(9),
            ..RoundConfig::default()
        };
        assert_eq!(Round::new(&missing, 1).err(), Some(SimError::UnknownPreset(9)));
    }

    #[test]
    fn test_preset_round() {
        let config = RoundConfig {
            width: 12,
            height: 12,
            preset: Some(3),
            ..RoundConfig::default()
        };
        let round = Round::new(&config, 8).unwrap();
        // Presets carry their own dimensions
        assert_eq!(round.level.width(), GRID_WIDTH);
        assert_eq!(round.level.height(), GRID_HEIGHT);
    }

    #[test]
    fn test_food_placed_by_step_skips_pending_age() {
        let mut food = Food::new(1000);
        food.init(IVec2::new(4, 3), FoodKind::Small);
        let mut round = Round::from_parts(
            Level::new(10, 10).unwrap(),
            Snake::new(IVec2::new(3, 3), Direction::Right),
            food,
            3,
            4,
        );
        assert_eq!(round.step(), StepOutcome::Advanced);
        assert_eq!(round.snake.len(), 3);

        assert!(!round.age_food(5000));
        assert_eq!(round.food.age_ms(), 0);
        assert_eq!(round.snake.score(), 2);

        // Later frames age it normally
        assert!(!round.age_food(16));
        assert_eq!(round.food.age_ms(), 16);
    }

    #[test]
    fn test_no_room_for_snake() {
        let mut rng = Pcg32::seed_from_u64(5);
        let full = Level::from_data(4, 4, &[1; 16]).unwrap();
        assert_eq!(place_snake(&full, &mut rng), Err(SimError::NoRoomForSnake));

        // Clear cells exist, but never three in a row
        let striped = Level::from_data(4, 2, &[0, 0, 1, 1, 1, 0, 0, 1]).unwrap();
        assert_eq!(place_snake(&striped, &mut rng), Err(SimError::NoRoomForSnake));
    }

    #[test]
    fn test_food_expiry_penalizes_and_replaces() {
        let level = Level::new(10, 10).unwrap();
        let mut snake = Snake::new(IVec2::new(3, 3), Direction::Right);
        snake.add_score(10);
        let mut food = Food::new(1000);
        food.init(IVec2::new(7, 7), FoodKind::Small);
        let mut round = Round::from_parts(level, snake, food, 3, 99);

        assert!(!round.age_food(999));
        assert_eq!(round.snake.score(), 10);
        assert!(round.age_food(1));
        assert_eq!(round.snake.score(), 7);
        assert_eq!(round.food.age_ms(), 0);
        assert!(!round.snake.occupies(round.food.position));
    }

    #[test]
    fn test_food_expiry_floors_score() {
        let mut round = Round::from_parts(
            Level::new(10, 10).unwrap(),
            Snake::new(IVec2::new(3, 3), Direction::Right),
            Food::new(10),
            3,
            1,
        );
        round.snake.add_score(1);
        assert!(round.age_food(10));
        assert_eq!(round.snake.score(), 0);
    }

    #[test]
    fn test_food_expiry_without_room_is_noop() {
        // Only the snake's own cells are clear
        let level = Level::from_data(3, 1, &[0, 0, 2]).unwrap();
        let snake =
            Snake::from_segments([IVec2::new(1, 0), IVec2::new(0, 0)], Direction::Right).unwrap();
        let mut food = Food::new(10);
        food.init(IVec2::new(2, 0), FoodKind::Medium);
        let mut round = Round::from_parts(level, snake, food, 3, 1);
        round.snake.add_score(5);

        assert!(!round.age_food(50));
        assert_eq!(round.snake.score(), 5);
        assert_eq!(round.food.position, IVec2::new(2, 0));
        assert!(round.food.is_expired());
    }

    #[test]
    fn test_events_drain() {
        let mut level = Level::new(10, 10).unwrap();
        level.set_cell(IVec2::new(4, 3), Cell::Thump);
        let mut round = Round::from_parts(
            level,
            Snake::new(IVec2::new(3, 3), Direction::Right),
            Food::default(),
            3,
            1,
        );
        assert_eq!(round.step(), StepOutcome::Blocked);
        assert_eq!(round.drain_events(), vec![GameEvent::Cue(AudioCue::Thump)]);
        assert!(round.pending_events().is_empty());
    }
}

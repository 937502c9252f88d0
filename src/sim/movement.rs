//! Movement and collision resolution
//!
//! One call to [`step`] moves the snake a single cell. Collisions are checked
//! in a fixed order: obstacles, then the snake's own body, then food.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::food::{Food, FoodKind};
use super::grid::{Cell, Level};
use super::round::{AudioCue, GameEvent};
use super::snake::{DeathCause, Direction, Snake};

/// Result of one movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// A harmless obstacle stopped the snake; nothing moved
    Blocked,
    /// The snake died (or was already dead)
    Dead(DeathCause),
    /// The snake moved or grew
    Advanced,
}

/// Cell the head would enter next, wrapped onto the grid
pub fn next_head(snake: &Snake, level: &Level) -> IVec2 {
    level.wrap(snake.head() + snake.direction.delta())
}

/// Advance the snake one cell in its current direction
pub fn step<R: Rng>(
    snake: &mut Snake,
    level: &Level,
    food: &mut Food,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> StepOutcome {
    if let Some(cause) = snake.death() {
        return StepOutcome::Dead(cause);
    }

    let candidate = next_head(snake, level);

    match level.cell(candidate) {
        Cell::Thump => {
            events.push(GameEvent::Cue(AudioCue::Thump));
            return StepOutcome::Blocked;
        }
        cell if cell.is_lethal() => return die(snake, DeathCause::Wall, events),
        _ => {}
    }

    if snake.body_hits(candidate) {
        return die(snake, DeathCause::SelfBite, events);
    }

    if food.position == candidate {
        events.push(GameEvent::Cue(AudioCue::Pickup));
        let eaten = food.kind;

        // The new head will cover `candidate`, so food may not land there
        let Some(spot) = level.empty_cell_by(rng, |p| p == candidate || snake.occupies(p)) else {
            return die(snake, DeathCause::Obesity, events);
        };
        food.init(spot, FoodKind::random(rng));

        snake.grow_to(candidate);
        snake.add_score(eaten.points());
        log::debug!(
            "Ate {:?} food, length {} score {}",
            eaten,
            snake.len(),
            snake.score()
        );
    } else {
        snake.advance_to(candidate);
    }

    StepOutcome::Advanced
}

/// Change heading and take an immediate extra step
///
/// Returns `None` when `direction` is the current heading or its inverse.
pub fn set_direction<R: Rng>(
    snake: &mut Snake,
    direction: Direction,
    level: &Level,
    food: &mut Food,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> Option<StepOutcome> {
    if direction == snake.direction || direction == snake.direction.inverse() {
        return None;
    }
    snake.direction = direction;
    Some(step(snake, level, food, rng, events))
}

fn die(snake: &mut Snake, cause: DeathCause, events: &mut Vec<GameEvent>) -> StepOutcome {
    log::debug!("Snake died: {} (score {})", cause.as_str(), snake.score());
    snake.kill(cause);
    events.push(GameEvent::Cue(AudioCue::Death));
    StepOutcome::Dead(cause)
}

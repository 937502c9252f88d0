//! Render snapshot
//!
//! A flattened, serializable copy of what a renderer needs for one frame.
//! Renderers never reach into the simulation directly.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Banner, FoodKind, Game, GamePhase};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameView {
    pub width: i32,
    pub height: i32,
    pub cell_size: u32,
    /// Working grid as cell tags, row-major
    pub cells: Vec<u8>,
    /// Head first
    pub snake: Vec<IVec2>,
    pub snake_alive: bool,
    pub food: IVec2,
    pub food_kind: FoodKind,
    /// 0.0 when fresh, 1.0 at expiry
    pub food_age: f32,
    pub score: u32,
    pub phase: GamePhase,
    pub banner: Option<Banner>,
    pub round_number: u32,
}

impl GameView {
    pub fn capture(game: &Game) -> Self {
        let round = game.round();
        let level = &round.level;
        Self {
            width: level.width(),
            height: level.height(),
            cell_size: level.cell_size(),
            cells: level.cells().iter().map(|c| c.tag()).collect(),
            snake: round.snake.segments().iter().copied().collect(),
            snake_alive: round.snake.is_alive(),
            food: round.food.position,
            food_kind: round.food.kind,
            food_age: round.food.age_fraction(),
            score: round.snake.score(),
            phase: game.phase(),
            banner: game.banner().cloned(),
            round_number: game.round_number(),
        }
    }

    /// Pixel rectangle `(x, y, size)` of a cell
    pub fn cell_rect(&self, pos: IVec2) -> (f64, f64, f64) {
        let size = self.cell_size as f64;
        (pos.x as f64 * size, pos.y as f64 * size, size)
    }

    /// Canvas size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.width as u32 * self.cell_size,
            self.height as u32 * self.cell_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameConfig;

    #[test]
    fn test_capture_matches_game() {
        let game = Game::new(GameConfig::default(), 9, 0).unwrap();
        let view = GameView::capture(&game);
        assert_eq!(view.cells.len(), (view.width * view.height) as usize);
        assert_eq!(view.snake.len(), 2);
        assert_eq!(view.snake[0], game.round().snake.head());
        assert_eq!(view.phase, GamePhase::Starting);
        assert_eq!(view.score, 0);
        assert_eq!(view.food_age, 0.0);
        assert_eq!(view.pixel_size(), (450, 450));
        assert_eq!(view.cell_rect(IVec2::new(2, 3)), (30.0, 45.0, 15.0));
    }

    #[test]
    fn test_view_serializes() {
        let game = Game::new(GameConfig::default(), 3, 0).unwrap();
        let json = serde_json::to_string(&GameView::capture(&game)).unwrap();
        let back: GameView = serde_json::from_str(&json).unwrap();
        assert_eq!(back.round_number, 1);
    }
}

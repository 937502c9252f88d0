//! Snake entity
//!
//! Plain data plus small helpers. The movement engine is the only code that
//! mutates segments, and it stops doing so once the snake is dead.

use std::collections::VecDeque;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::error::SimError;

/// Heading of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Inverse of each direction, indexed like `ALL`
    const INVERSE: [Direction; 4] = [
        Direction::Down,
        Direction::Up,
        Direction::Right,
        Direction::Left,
    ];

    fn slot(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub fn inverse(self) -> Direction {
        Self::INVERSE[self.slot()]
    }

    /// Grid offset of one step (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// Why a snake died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Ran into a lethal obstacle
    Wall,
    /// Ran into its own body
    SelfBite,
    /// Ate the last food the grid had room for
    Obesity,
}

impl DeathCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::Wall => "wall",
            DeathCause::SelfBite => "self",
            DeathCause::Obesity => "obesity",
        }
    }
}

/// The player's snake; `segments[0]` is the head
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    segments: VecDeque<IVec2>,
    pub direction: Direction,
    death: Option<DeathCause>,
    score: u32,
}

impl Snake {
    /// Two-segment snake with its head at `head`, tail one cell behind it
    pub fn new(head: IVec2, direction: Direction) -> Self {
        let mut segments = VecDeque::with_capacity(16);
        segments.push_back(head);
        segments.push_back(head - direction.delta());
        Self {
            segments,
            direction,
            death: None,
            score: 0,
        }
    }

    /// Build a snake from explicit head-first segments
    pub fn from_segments(
        segments: impl IntoIterator<Item = IVec2>,
        direction: Direction,
    ) -> Result<Self, SimError> {
        let segments: VecDeque<IVec2> = segments.into_iter().collect();
        if segments.len() < 2 {
            return Err(SimError::SnakeTooShort(segments.len()));
        }
        Ok(Self {
            segments,
            direction,
            death: None,
            score: 0,
        })
    }

    pub fn head(&self) -> IVec2 {
        self.segments[0]
    }

    pub fn segments(&self) -> &VecDeque<IVec2> {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a snake never has fewer than two segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether any segment sits on `pos`
    pub fn occupies(&self, pos: IVec2) -> bool {
        self.segments.contains(&pos)
    }

    /// Whether any segment but the tail sits on `pos`
    pub fn body_hits(&self, pos: IVec2) -> bool {
        self.segments
            .iter()
            .take(self.segments.len() - 1)
            .any(|&seg| seg == pos)
    }

    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    pub fn death(&self) -> Option<DeathCause> {
        self.death
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn kill(&mut self, cause: DeathCause) {
        if self.death.is_none() {
            self.death = Some(cause);
        }
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Remove points, never dropping below zero
    pub(crate) fn penalize(&mut self, points: u32) {
        self.score = self.score.saturating_sub(points);
    }

    /// Grow by placing a new head at `pos`
    pub(crate) fn grow_to(&mut self, pos: IVec2) {
        self.segments.push_front(pos);
    }

    /// Move by recycling the tail segment as the new head at `pos`
    pub(crate) fn advance_to(&mut self, pos: IVec2) {
        if let Some(tail) = self.segments.back_mut() {
            *tail = pos;
        }
        self.segments.rotate_right(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_pairs() {
        assert_eq!(Direction::Up.inverse(), Direction::Down);
        assert_eq!(Direction::Down.inverse(), Direction::Up);
        assert_eq!(Direction::Left.inverse(), Direction::Right);
        assert_eq!(Direction::Right.inverse(), Direction::Left);
        for dir in Direction::ALL {
            assert_eq!(dir.inverse().inverse(), dir);
            assert_eq!(dir.delta() + dir.inverse().delta(), IVec2::ZERO);
        }
    }

    #[test]
    fn test_new_snake_layout() {
        let snake = Snake::new(IVec2::new(5, 5), Direction::Right);
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), IVec2::new(5, 5));
        assert_eq!(snake.segments()[1], IVec2::new(4, 5));
        assert!(snake.is_alive());
        assert_eq!(snake.score(), 0);
    }

    #[test]
    fn test_from_segments_requires_two() {
        assert_eq!(
            Snake::from_segments([IVec2::ZERO], Direction::Up),
            Err(SimError::SnakeTooShort(1))
        );
        assert!(Snake::from_segments([IVec2::ZERO, IVec2::X], Direction::Left).is_ok());
    }

    #[test]
    fn test_body_hits_skips_tail() {
        let snake = Snake::from_segments(
            [IVec2::new(2, 2), IVec2::new(1, 2), IVec2::new(0, 2)],
            Direction::Right,
        )
        .unwrap();
        assert!(snake.body_hits(IVec2::new(1, 2)));
        assert!(!snake.body_hits(IVec2::new(0, 2)));
        assert!(snake.occupies(IVec2::new(0, 2)));
    }

    #[test]
    fn test_score_floor() {
        let mut snake = Snake::new(IVec2::ZERO, Direction::Down);
        snake.add_score(2);
        snake.penalize(3);
        assert_eq!(snake.score(), 0);
    }

    #[test]
    fn test_first_death_sticks() {
        let mut snake = Snake::new(IVec2::ZERO, Direction::Down);
        snake.kill(DeathCause::Obesity);
        snake.kill(DeathCause::Wall);
        assert_eq!(snake.death(), Some(DeathCause::Obesity));
        assert!(!snake.is_alive());
    }
}

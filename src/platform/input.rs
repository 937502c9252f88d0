//! Keyboard state
//!
//! The host records key presses into a [`Keyboard`]; the game controller only
//! queries it through [`KeyInput`].

use std::collections::HashSet;

use crate::sim::Direction;

/// Keys the game cares about, plus any other key code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Pause,
    Other(u32),
}

impl Key {
    /// Steering keys in polling priority order
    pub const ARROWS: [Key; 4] = [Key::Up, Key::Down, Key::Left, Key::Right];

    /// Map a DOM `keyCode`
    pub fn from_code(code: u32) -> Self {
        match code {
            37 => Key::Left,
            38 => Key::Up,
            39 => Key::Right,
            40 => Key::Down,
            80 => Key::Pause,
            other => Key::Other(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Key::Left => 37,
            Key::Up => 38,
            Key::Right => 39,
            Key::Down => 40,
            Key::Pause => 80,
            Key::Other(code) => code,
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Read access to key state
pub trait KeyInput {
    fn is_key_down(&self, key: Key) -> bool;
    fn has_any_key_down(&self) -> bool;
    /// Forget every current press so held keys must be pressed again
    fn release_all(&mut self);
}

/// Pressed-key set plus the keys whose default host behavior is suppressed
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    pressed: HashSet<Key>,
    suppressed: HashSet<Key>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyboard that suppresses arrow-key scrolling
    pub fn for_game() -> Self {
        let mut keyboard = Self::new();
        for key in Key::ARROWS {
            keyboard.suppress(key);
        }
        keyboard
    }

    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    pub fn suppress(&mut self, key: Key) {
        self.suppressed.insert(key);
    }

    /// Whether the host should cancel the default action for `key`
    pub fn is_suppressed(&self, key: Key) -> bool {
        self.suppressed.contains(&key)
    }
}

impl KeyInput for Keyboard {
    fn is_key_down(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn has_any_key_down(&self) -> bool {
        !self.pressed.is_empty()
    }

    fn release_all(&mut self) {
        self.pressed.clear();
    }
}

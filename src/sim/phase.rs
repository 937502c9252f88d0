//! Game phase state machine
//!
//! The controller decides, once per frame, whether the simulation may run.
//! Only the `Active` phase ticks the snake and ages food; every other phase
//! waits for a debounced key press.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::movement::StepOutcome;
use super::round::{GameEvent, Round, RoundConfig};
use super::schedule::{FrameLoop, FrameToken, Ticker};
use super::snake::DeathCause;
use crate::consts::{DEBOUNCE_MS, TICK_INTERVAL_MS};
use crate::platform::{Key, KeyInput};

/// Top-level round state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh round, not yet shown to the player
    Starting,
    /// Snake moving, food aging
    Active,
    /// Snake died, waiting for a key to restart
    WaitingAfterDeath,
    /// Frozen until a key is pressed
    Paused,
    /// Tearing down the round; never observed between frames
    Restarting,
}

/// Two-line overlay message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub title: String,
    pub subtitle: String,
}

impl Banner {
    fn new(title: &str, subtitle: &str) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
        }
    }

    pub fn start() -> Self {
        Self::new("Start Game.", "Press any key to start.")
    }

    pub fn paused() -> Self {
        Self::new("Paused.", "Press any key to continue.")
    }

    pub fn death(cause: DeathCause) -> Self {
        let title = match cause {
            DeathCause::Wall => "You died, crashed into a wall!",
            DeathCause::SelfBite => "You died, bitten by your own tail!",
            DeathCause::Obesity => "You win, but grew too fat to live!",
        };
        Self::new(title, "Press any key to restart.")
    }
}

/// Controller timing and round setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub round: RoundConfig,
    pub tick_interval_ms: u64,
    pub debounce_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round: RoundConfig::default(),
            tick_interval_ms: TICK_INTERVAL_MS,
            debounce_ms: DEBOUNCE_MS,
        }
    }
}

/// The game phase controller; owns the current round
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    phase: GamePhase,
    phase_entered_at: u64,
    round: Round,
    round_number: u32,
    banner: Option<Banner>,
    ticker: Ticker,
    frames: FrameLoop,
    /// Baseline for the active time fed to the food
    last_active_ms: u64,
    /// Partial tick interval carried across a pause
    tick_carry_ms: u64,
    seeds: Pcg32,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create a game and its first round
    pub fn new(config: GameConfig, seed: u64, now_ms: u64) -> Result<Self, SimError> {
        let mut seeds = Pcg32::seed_from_u64(seed);
        let round = Round::new(&config.round, seeds.random())?;
        log::info!("Game created with seed {}", seed);
        Ok(Self::assemble(config, round, seeds, now_ms))
    }

    /// Create a game around a prepared round; restarts still generate
    pub fn with_round(config: GameConfig, round: Round, seed: u64, now_ms: u64) -> Self {
        Self::assemble(config, round, Pcg32::seed_from_u64(seed), now_ms)
    }

    fn assemble(config: GameConfig, round: Round, seeds: Pcg32, now_ms: u64) -> Self {
        let ticker = Ticker::new(config.tick_interval_ms, now_ms);
        Self {
            config,
            phase: GamePhase::Starting,
            phase_entered_at: now_ms,
            round,
            round_number: 1,
            banner: None,
            ticker,
            frames: FrameLoop::new(),
            last_active_ms: now_ms,
            tick_carry_ms: 0,
            seeds,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn phase_entered_at(&self) -> u64 {
        self.phase_entered_at
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Take queued events for audio and other collaborators
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Frame loop control ===

    /// Start (or restart) the frame loop
    pub fn start_loop(&mut self) -> FrameToken {
        self.frames.start()
    }

    /// Stop the frame loop; frames already scheduled will be refused
    pub fn stop_loop(&mut self) {
        self.frames.stop();
    }

    pub fn next_frame_token(&self) -> Option<FrameToken> {
        self.frames.next_token()
    }

    /// Run one scheduled frame
    ///
    /// Returns `Ok(false)` without touching any state when the token belongs
    /// to a stopped or superseded loop.
    pub fn frame<I: KeyInput + ?Sized>(
        &mut self,
        token: FrameToken,
        now_ms: u64,
        input: &mut I,
    ) -> Result<bool, SimError> {
        if !self.frames.accept(token) {
            return Ok(false);
        }
        self.update(now_ms, input)?;
        Ok(true)
    }

    // === Phase evaluation ===

    /// Advance the state machine by one frame
    pub fn update<I: KeyInput + ?Sized>(
        &mut self,
        now_ms: u64,
        input: &mut I,
    ) -> Result<(), SimError> {
        match self.phase {
            GamePhase::Starting => {
                self.enter(GamePhase::Paused, now_ms);
                self.banner = Some(Banner::start());
            }
            GamePhase::Paused => {
                if self.key_gate_open(now_ms, input) {
                    self.resume(now_ms, input);
                }
            }
            GamePhase::WaitingAfterDeath => {
                if self.key_gate_open(now_ms, input) {
                    self.enter(GamePhase::Restarting, now_ms);
                    self.restart(now_ms)?;
                }
            }
            GamePhase::Restarting => self.restart(now_ms)?,
            GamePhase::Active => self.run_active(now_ms, input),
        }
        self.events.extend(self.round.drain_events());
        Ok(())
    }

    fn enter(&mut self, phase: GamePhase, now_ms: u64) {
        log::debug!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.phase_entered_at = now_ms;
    }

    /// Any key down, and held off long enough after entering the phase
    fn key_gate_open<I: KeyInput + ?Sized>(&self, now_ms: u64, input: &I) -> bool {
        input.has_any_key_down()
            && now_ms.saturating_sub(self.phase_entered_at) >= self.config.debounce_ms
    }

    fn resume<I: KeyInput + ?Sized>(&mut self, now_ms: u64, input: &mut I) {
        self.enter(GamePhase::Active, now_ms);
        self.banner = None;
        input.release_all();
        self.ticker.resume(now_ms, self.tick_carry_ms);
        self.last_active_ms = now_ms;
        self.events.push(GameEvent::MusicResumed);
    }

    fn pause(&mut self, now_ms: u64) {
        // Bank the active time up to now; the food clock stops here
        let dt = now_ms.saturating_sub(self.last_active_ms);
        self.round.food.advance(dt);
        self.tick_carry_ms = self.ticker.elapsed(now_ms).min(self.ticker.interval_ms());

        self.enter(GamePhase::Paused, now_ms);
        self.banner = Some(Banner::paused());
        self.events.push(GameEvent::MusicPaused);
        log::info!("Paused at score {}", self.round.snake.score());
    }

    fn run_active<I: KeyInput + ?Sized>(&mut self, now_ms: u64, input: &mut I) {
        if input.is_key_down(Key::Pause) {
            self.pause(now_ms);
            return;
        }

        // Only the first held arrow counts, in Up/Down/Left/Right order
        if let Some(dir) = Key::ARROWS
            .into_iter()
            .find(|&key| input.is_key_down(key))
            .and_then(Key::direction)
        {
            if let Some(outcome) = self.round.set_direction(dir) {
                self.ticker.reset(now_ms);
                if self.handle_outcome(outcome, now_ms) {
                    return;
                }
            }
        }

        if self.ticker.is_due(now_ms) {
            let outcome = self.round.step();
            self.ticker.reset(now_ms);
            if self.handle_outcome(outcome, now_ms) {
                return;
            }
        }

        let dt = now_ms.saturating_sub(self.last_active_ms);
        self.last_active_ms = now_ms;
        self.round.age_food(dt);
    }

    /// Returns true when the outcome ended the active phase
    fn handle_outcome(&mut self, outcome: StepOutcome, now_ms: u64) -> bool {
        let StepOutcome::Dead(cause) = outcome else {
            return false;
        };
        self.enter(GamePhase::WaitingAfterDeath, now_ms);
        self.banner = Some(Banner::death(cause));
        self.events.push(GameEvent::MusicPaused);
        log::info!(
            "Round {} over ({}), score {}",
            self.round_number,
            cause.as_str(),
            self.round.snake.score()
        );
        true
    }

    fn restart(&mut self, now_ms: u64) -> Result<(), SimError> {
        // Cues from the finished round are still owed to the host
        self.events.extend(self.round.drain_events());
        self.round = Round::new(&self.config.round, self.seeds.random())?;
        self.round_number += 1;
        self.banner = None;
        self.ticker.reset(now_ms);
        self.tick_carry_ms = 0;
        self.last_active_ms = now_ms;
        self.enter(GamePhase::Starting, now_ms);
        Ok(())
    }
}

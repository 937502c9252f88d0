//! Tick and frame scheduling
//!
//! Both pieces run on caller-supplied wall-clock milliseconds, so tests can
//! drive them with synthetic time.

use serde::{Deserialize, Serialize};

/// Periodic tick source measured in real elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    interval_ms: u64,
    last_ms: u64,
}

impl Ticker {
    pub fn new(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: now_ms,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Whether a full interval has passed since the last baseline
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_ms) >= self.interval_ms
    }

    /// Move the baseline to `now_ms`
    pub fn reset(&mut self, now_ms: u64) {
        self.last_ms = now_ms;
    }

    /// Time since the baseline
    pub fn elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_ms)
    }

    /// Put the baseline `elapsed_ms` before `now_ms`, carrying a partial
    /// interval across a pause
    pub fn resume(&mut self, now_ms: u64, elapsed_ms: u64) {
        self.last_ms = now_ms.saturating_sub(elapsed_ms);
    }
}

/// Proof that a frame was scheduled by a particular run of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

/// Start/stop control for a host frame loop
///
/// Every `start` opens a new generation. Frames scheduled under an older
/// generation, or after `stop`, are refused by [`FrameLoop::accept`].
#[derive(Debug, Default)]
pub struct FrameLoop {
    generation: u64,
    running: bool,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new run and return the token for its first frame
    pub fn start(&mut self) -> FrameToken {
        self.generation += 1;
        self.running = true;
        FrameToken(self.generation)
    }

    /// Stop the loop; safe to call any number of times
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.generation += 1;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Token to hand the next scheduled frame, if still running
    pub fn next_token(&self) -> Option<FrameToken> {
        self.running.then_some(FrameToken(self.generation))
    }

    /// Whether a frame carrying `token` may run
    pub fn accept(&self, token: FrameToken) -> bool {
        self.running && token.0 == self.generation
    }
}

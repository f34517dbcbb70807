//! Move timing validation.
//!
//! The server doesn't run its own game loop. It bounds the gap between
//! consecutive moves instead: faster than `min_move_interval` means the
//! client is flooding moves, and slower than `max_move_interval` means a
//! stalled or replayed submission.

use std::time::{Duration, Instant};

use lightcycle_session::GameSession;

use crate::{GameConfig, TimingViolation};

/// Decides whether a move's timing is acceptable.
#[derive(Debug, Clone, Copy)]
pub struct MoveValidator {
    min_interval: Duration,
    max_interval: Duration,
}

impl MoveValidator {
    pub fn new(min_interval: Duration, max_interval: Duration) -> Self {
        Self {
            min_interval,
            max_interval,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.min_move_interval, config.max_move_interval)
    }

    /// Checks a move arriving at `now` against the session's last move.
    ///
    /// The first move of a session is always accepted; there is nothing
    /// to measure it against. Both bounds are inclusive: exactly
    /// `min_interval` or exactly `max_interval` is fine.
    pub fn validate(&self, session: &GameSession, now: Instant) -> Result<(), TimingViolation> {
        if !session.has_moved() {
            return Ok(());
        }
        let elapsed = session.idle_for(now);
        if elapsed < self.min_interval {
            return Err(TimingViolation::TooFast { elapsed });
        }
        if elapsed > self.max_interval {
            return Err(TimingViolation::TooSlow { elapsed });
        }
        Ok(())
    }
}

impl Default for MoveValidator {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

//! Scoring and the process-wide leaderboard.
//!
//! The leaderboard is a single shared record: the best score since the
//! server started and who holds it. [`Scoreboard`] exposes it only through
//! an atomic compare-and-update, so two sessions finishing at the same
//! moment can't both read the old record and both claim to have beaten it.

use std::sync::{PoisonError, RwLock};

use lightcycle_session::GameSession;
use serde::{Deserialize, Serialize};

use crate::GameConfig;

/// The current record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub high_score: u32,
    pub top_player: String,
}

/// The result of scoring one finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreOutcome {
    /// Authoritative score: one point per recorded move.
    pub score: u32,
    /// `true` if this session set a new record.
    pub new_high_score: bool,
    /// The record right after this session was scored.
    pub high_score: u32,
}

/// Owns the leaderboard.
#[derive(Debug)]
pub struct Scoreboard {
    state: RwLock<GameState>,
    challenger_label: String,
}

impl Scoreboard {
    pub fn new(seed: GameState, challenger_label: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(seed),
            challenger_label: challenger_label.into(),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            GameState {
                high_score: config.seed_high_score,
                top_player: config.seed_top_player.clone(),
            },
            config.challenger_label.clone(),
        )
    }

    /// Scores a finished session and updates the record if it was beaten.
    ///
    /// The caller has already confirmed the crash and deactivated the
    /// session; neither is rechecked here.
    pub fn finalize(&self, session: &GameSession) -> ScoreOutcome {
        let score = u32::try_from(session.trail_len()).unwrap_or(u32::MAX);
        let (new_high_score, high_score) = self.compare_and_update(score);
        ScoreOutcome {
            score,
            new_high_score,
            high_score,
        }
    }

    /// Replaces the record if `candidate` is strictly greater. Returns
    /// whether it did.
    pub fn try_update(&self, candidate: u32) -> bool {
        self.compare_and_update(candidate).0
    }

    /// A copy of the current record.
    pub fn snapshot(&self) -> GameState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn compare_and_update(&self, candidate: u32) -> (bool, u32) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if candidate > state.high_score {
            state.high_score = candidate;
            state.top_player.clone_from(&self.challenger_label);
            (true, candidate)
        } else {
            (false, state.high_score)
        }
    }
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

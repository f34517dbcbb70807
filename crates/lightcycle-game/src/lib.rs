//! Game rules and server-side anti-cheat for Lightcycle.
//!
//! The client plays the game and reports each move; this crate decides
//! what actually happened. It never trusts a client-declared outcome:
//! the trail, the move timing, and the crash are all re-derived from the
//! moves the server itself accepted.
//!
//! # Key types
//!
//! - [`GameEngine`]: the client operations (start, move, score, logs,
//!   leaderboard) and expiry
//! - [`MoveValidator`]: bounds on time between moves
//! - [`CrashValidator`]: wall and self-collision checks
//! - [`Scoreboard`]: the process-wide record, updated atomically
//! - [`EventLog`]: bounded ring of recent human-readable events
//! - [`ExpiryReaper`]: background task evicting idle sessions

mod config;
mod crash;
mod engine;
mod error;
mod events;
mod moves;
mod reaper;
mod score;

pub use config::GameConfig;
pub use crash::{CrashKind, CrashValidator};
pub use engine::GameEngine;
pub use error::{GameError, TimingViolation};
pub use events::{DEFAULT_EVENT_LOG_CAPACITY, EventLog};
pub use moves::MoveValidator;
pub use reaper::ExpiryReaper;
pub use score::{GameState, ScoreOutcome, Scoreboard};

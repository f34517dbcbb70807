//! Session types: the data structures that represent one game.
//!
//! A "session" is the server's record of a single light-cycle run. It
//! tracks:
//! - WHICH game this is (`SessionId`)
//! - WHERE the cycle has been (the trail, in move order)
//! - WHEN it started and last moved (for move timing and expiry)
//! - WHETHER it can still accept moves (`active`)

use std::time::{Duration, Instant};

use lightcycle_protocol::{Position, SessionId};

use crate::SessionError;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session lifetime.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a session may go without an accepted move before the
    /// expiry sweep removes it.
    ///
    /// Default: 10 minutes.
    pub session_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_timeout: Duration::from_secs(10 * 60),
        }
    }
}

// ---------------------------------------------------------------------------
// GameSession
// ---------------------------------------------------------------------------

/// One game, from `start_game` until it is scored or expires.
///
/// The lifecycle is one-way:
///
/// ```text
///   active ──(valid crash)──→ inactive
///     │
///     └──(idle > timeout)──→ removed from the store
/// ```
///
/// Fields are private so the two invariants can't be bypassed: the trail
/// only grows, and only while the session is active; and an inactive
/// session never becomes active again.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    trail: Vec<Position>,
    started_at: Instant,
    last_move_at: Instant,
    active: bool,
}

impl GameSession {
    /// Creates an active session with an empty trail.
    pub fn new(id: SessionId, now: Instant) -> Self {
        Self {
            id,
            trail: Vec::new(),
            started_at: now,
            last_move_at: now,
            active: true,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// The authoritative move history, oldest first.
    pub fn trail(&self) -> &[Position] {
        &self.trail
    }

    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    /// `true` once at least one move has been recorded. The first move is
    /// exempt from timing checks because there's nothing to measure from.
    pub fn has_moved(&self) -> bool {
        !self.trail.is_empty()
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// When the last move was accepted (or the session was created, if
    /// no move has been accepted yet).
    pub fn last_move_at(&self) -> Instant {
        self.last_move_at
    }

    /// Time since the last accepted move. Saturates to zero if `now` is
    /// somehow earlier than the last move.
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_move_at)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Appends `position` to the trail and stamps `last_move_at`.
    ///
    /// Returns the new trail length.
    ///
    /// # Errors
    /// [`SessionError::Inactive`] if the session has been finalized; the
    /// trail is left untouched.
    pub fn record_move(&mut self, position: Position, now: Instant) -> Result<usize, SessionError> {
        if !self.active {
            return Err(SessionError::Inactive(self.id.clone()));
        }
        self.trail.push(position);
        self.last_move_at = now;
        Ok(self.trail.len())
    }

    /// Marks the session finished. Idempotent; there is no way back.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

//! Error types for the game layer.
//!
//! Every variant is an expected, player-triggerable outcome. None of them
//! is fatal; the engine returns them and the connection handler turns
//! them into an error reply.

use std::time::Duration;

use lightcycle_protocol::{Position, SessionId};
use lightcycle_session::SessionError;

/// Why a move's timing was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimingViolation {
    /// Faster than the game tick physically allows.
    #[error("move too fast ({elapsed:?} since previous)")]
    TooFast { elapsed: Duration },

    /// Slower than any legitimate pause.
    #[error("move too slow ({elapsed:?} since previous)")]
    TooSlow { elapsed: Duration },
}

impl TimingViolation {
    /// Time since the previous accepted move.
    pub fn elapsed(&self) -> Duration {
        match self {
            Self::TooFast { elapsed } | Self::TooSlow { elapsed } => *elapsed,
        }
    }
}

/// Errors returned by [`GameEngine`](crate::GameEngine) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Unknown or expired session. The two look the same on purpose.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The session was already scored.
    #[error("session {0} is no longer active")]
    InactiveSession(SessionId),

    /// The move arrived outside the allowed timing window. The session
    /// stays active and the trail is unchanged.
    #[error(transparent)]
    Timing(#[from] TimingViolation),

    /// Too few moves were recorded for the session to be scored.
    #[error("trail too short ({moves} moves)")]
    InsufficientTrail { moves: usize },

    /// The reported final position is neither off the board nor on the
    /// trail.
    #[error("no crash at {0}: not in trail or bounds")]
    InvalidCrash(Position),
}

impl GameError {
    /// Stable machine-readable tag for the error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::InactiveSession(_) => "inactive_session",
            Self::Timing(TimingViolation::TooFast { .. }) => "too_fast",
            Self::Timing(TimingViolation::TooSlow { .. }) => "too_slow",
            Self::InsufficientTrail { .. } => "insufficient_trail",
            Self::InvalidCrash(_) => "invalid_crash",
        }
    }

    /// HTTP-style status code.
    ///
    /// 429 means "retry", 404/409 mean "your session is gone", and
    /// 400/422 mean "we rejected what you claimed".
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InactiveSession(_) => 409,
            Self::Timing(_) => 429,
            Self::InsufficientTrail { .. } => 422,
            Self::InvalidCrash(_) => 400,
        }
    }

    /// The message shown to the player.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Invalid session ID",
            Self::InactiveSession(_) => "Session is no longer active",
            Self::Timing(TimingViolation::TooFast { .. }) => "Moves are too fast",
            Self::Timing(TimingViolation::TooSlow { .. }) => "Moves are too slow",
            Self::InsufficientTrail { .. } => "Trail too short - play the game first",
            Self::InvalidCrash(_) => "Invalid game over state - crash location not valid",
        }
    }
}

impl From<SessionError> for GameError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(id) => Self::NotFound(id),
            SessionError::Inactive(id) => Self::InactiveSession(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn all() -> Vec<GameError> {
        let id = SessionId::from("s");
        let elapsed = Duration::from_millis(1);
        vec![
            GameError::NotFound(id.clone()),
            GameError::InactiveSession(id),
            TimingViolation::TooFast { elapsed }.into(),
            TimingViolation::TooSlow { elapsed }.into(),
            GameError::InsufficientTrail { moves: 1 },
            GameError::InvalidCrash(Position::new(2, 2)),
        ]
    }

    #[test]
    fn test_kinds_and_messages_are_distinct() {
        let errors = all();
        let kinds: HashSet<_> = errors.iter().map(GameError::kind).collect();
        let messages: HashSet<_> = errors.iter().map(GameError::client_message).collect();

        assert_eq!(kinds.len(), errors.len());
        assert_eq!(messages.len(), errors.len());
    }

    #[test]
    fn test_session_error_maps_to_game_error() {
        let id = SessionId::from("gone");

        assert_eq!(
            GameError::from(SessionError::NotFound(id.clone())),
            GameError::NotFound(id.clone())
        );
        assert_eq!(
            GameError::from(SessionError::Inactive(id.clone())),
            GameError::InactiveSession(id)
        );
    }

    #[test]
    fn test_client_messages_keep_searchable_phrases() {
        // Existing clients match on these substrings.
        let errors = all();
        assert!(errors[0].client_message().to_lowercase().contains("invalid session"));
        assert!(errors[2].client_message().to_lowercase().contains("too fast"));
        assert!(errors[3].client_message().to_lowercase().contains("too slow"));
        assert!(errors[4].client_message().to_lowercase().contains("too short"));
        assert!(errors[5].client_message().to_lowercase().contains("not valid"));
    }

    #[test]
    fn test_timing_status_signals_retry() {
        let err: GameError = TimingViolation::TooSlow {
            elapsed: Duration::from_secs(3),
        }
        .into();
        assert_eq!(err.status(), 429);
        assert_eq!(err.kind(), "too_slow");
    }
}

//! Error types for the session layer.

use lightcycle_protocol::SessionId;

/// Errors that can occur while looking up or mutating a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No session exists for the given ID.
    ///
    /// Covers both "never existed" and "expired and swept"; the store
    /// doesn't remember removed IDs, so the two are indistinguishable.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The session exists but has already been finalized. Its trail is
    /// frozen and it can never become active again.
    #[error("session {0} is no longer active")]
    Inactive(SessionId),
}

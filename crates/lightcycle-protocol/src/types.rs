//! Core protocol types for Lightcycle's wire format.
//!
//! Every type here is something that gets serialized, sent over the
//! network, and deserialized on the other side. The JSON field names
//! match what the browser client already sends (`session_id`,
//! `final_position`, `high_score`, ...), so they are snake_case.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity and geometry
// ---------------------------------------------------------------------------

/// An opaque identifier for one game session.
///
/// Generated by the server when a game starts and echoed back by the
/// client on every move and on score submission. It carries no meaning
/// beyond "which session is this"; there's no signature or user binding.
///
/// `#[serde(transparent)]` makes it a plain JSON string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a raw identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cell on the game grid.
///
/// Coordinates are signed because a crash into the wall is reported as a
/// position just outside the board, e.g. `(-1, 5)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The frame every request and response travels in.
///
/// `seq` is chosen by the client. The server copies it onto the reply so a
/// client with several requests in flight can match answers to questions.
/// The generic `body` is a [`Request`] going in and a [`Response`] coming out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub seq: u64,
    pub body: T,
}

// ---------------------------------------------------------------------------
// Request: client → server
// ---------------------------------------------------------------------------

/// The operations a client can invoke.
///
/// Internally tagged (`{"type": "move", ...}`), which is the easiest
/// shape to build from JavaScript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Begin a new game. The reply carries the fresh session ID.
    StartGame,

    /// Report that the cycle's head moved to `position`.
    Move {
        session_id: SessionId,
        position: Position,
    },

    /// Report the end of the game.
    ///
    /// `score` is what the client thinks it earned. The server logs it
    /// and otherwise ignores it; the authoritative score is the length
    /// of the trail the server recorded.
    SubmitScore {
        session_id: SessionId,
        final_position: Position,
        score: i64,
    },

    /// Fetch the most recent server events.
    Logs,

    /// Fetch the current high score and its holder.
    Leaderboard,
}

// ---------------------------------------------------------------------------
// Response: server → client
// ---------------------------------------------------------------------------

/// Everything the server can answer with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// A new session exists; `status` is always `"started"`.
    GameStarted { session_id: SessionId, status: String },

    /// The move was appended to the trail; `status` is `"recorded"`.
    MoveRecorded { status: String },

    /// The crash was legitimate and the session has been scored.
    ScoreAccepted {
        message: String,
        score: u32,
        new_high_score: bool,
        high_score: u32,
        status: String,
    },

    /// Snapshot of the event log, oldest first.
    Logs { logs: Vec<String> },

    /// The current record holder.
    Leaderboard { high_score: u32, top_player: String },

    /// The request was refused.
    ///
    /// `kind` is a stable machine-readable tag (`"too_fast"`,
    /// `"not_found"`, ...); `code` follows HTTP status semantics so a
    /// client can bucket "retry" vs "session gone" vs "rejected".
    Error {
        code: u16,
        kind: String,
        message: String,
    },
}

impl Response {
    /// Builds an [`Response::Error`].
    pub fn error(code: u16, kind: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            kind: kind.to_owned(),
            message: message.into(),
        }
    }

    /// Returns `true` for [`Response::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

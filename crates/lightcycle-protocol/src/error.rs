//! Error types for the protocol layer.
//!
//! Each crate in Lightcycle defines its own error enum. When you see a
//! `ProtocolError`, you know the problem is in serialization, not in
//! session bookkeeping or game rules.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, an unknown `type` tag, missing
    /// fields, or coordinates that are not integers. The server reports
    /// this to the client as a malformed-input error and keeps the
    /// connection open.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame decoded but violates a protocol rule.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

//! Codec trait and implementations for serializing/deserializing frames.
//!
//! The server never touches `serde_json` directly: the connection handler
//! holds something that implements [`Codec`] and asks it to turn bytes
//! into an [`Envelope<Request>`](crate::Envelope) and a
//! [`Response`](crate::Response) back into bytes.
//!
//! [`JsonCodec`] is the only implementation today. Browser clients speak
//! JSON natively, so it is also the one the binary wires up.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because one codec instance is shared by every
/// connection task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if the value can't be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed or
    /// don't match the shape of `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// ## Example
///
/// ```rust
/// use lightcycle_protocol::{Codec, Envelope, JsonCodec, Position, Request, SessionId};
///
/// let codec = JsonCodec;
///
/// let frame = br#"{"seq":3,"body":{"type":"move","session_id":"abc","position":{"x":20,"y":21}}}"#;
/// let envelope: Envelope<Request> = codec.decode(frame).unwrap();
///
/// assert_eq!(envelope.seq, 3);
/// assert_eq!(
///     envelope.body,
///     Request::Move {
///         session_id: SessionId::from("abc"),
///         position: Position::new(20, 21),
///     }
/// );
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{Envelope, Request, Response};

    #[test]
    fn test_decode_garbage_returns_decode_error() {
        let result: Result<Envelope<Request>, _> = JsonCodec.decode(b"{not json");

        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_unknown_request_type_returns_decode_error() {
        let frame = br#"{"seq":1,"body":{"type":"teleport"}}"#;

        let result: Result<Envelope<Request>, _> = JsonCodec.decode(frame);

        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_fractional_coordinate_is_rejected() {
        // Grid coordinates are integers; a float means a tampered client.
        let frame = br#"{"seq":1,"body":{"type":"move","session_id":"a","position":{"x":1.5,"y":2}}}"#;

        let result: Result<Envelope<Request>, _> = JsonCodec.decode(frame);

        assert!(result.is_err());
    }

    #[test]
    fn test_encode_response_produces_tagged_json() {
        let envelope = Envelope {
            seq: 9,
            body: Response::MoveRecorded {
                status: "recorded".into(),
            },
        };

        let bytes = JsonCodec.encode(&envelope).expect("encode");
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["seq"], 9);
        assert_eq!(value["body"]["type"], "move_recorded");
        assert_eq!(value["body"]["status"], "recorded");
    }
}

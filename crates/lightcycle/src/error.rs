//! Unified error type for the server crate.

use lightcycle_protocol::ProtocolError;
use lightcycle_transport::TransportError;

/// Errors that end a connection or stop the server.
///
/// Game rule violations are not in here: they are ordinary outcomes,
/// answered with an error response while the connection carries on.
#[derive(Debug, thiserror::Error)]
pub enum LightcycleError {
    /// Binding, accepting, or moving bytes failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A response couldn't be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error_is_transparent() {
        let err = TransportError::SendFailed(std::io::Error::other("pipe gone"));
        let err: LightcycleError = err.into();

        assert!(matches!(err, LightcycleError::Transport(_)));
        assert_eq!(err.to_string(), "send failed: pipe gone");
    }

    #[test]
    fn test_from_protocol_error() {
        let err: LightcycleError = ProtocolError::InvalidMessage("bad".into()).into();
        assert!(matches!(err, LightcycleError::Protocol(_)));
    }
}

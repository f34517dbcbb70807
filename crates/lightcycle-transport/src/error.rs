use std::time::Duration;

/// Errors from accepting, reading, or writing a connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Binding the listening socket failed.
    #[error("bind failed: {0}")]
    BindFailed(#[source] std::io::Error),

    /// Accepting a TCP connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// The peer connected but the WebSocket upgrade failed.
    #[error("handshake with {peer} failed: {source}")]
    HandshakeFailed {
        peer: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The peer didn't finish the upgrade in time.
    #[error("handshake with {peer} timed out after {after:?}")]
    HandshakeTimeout {
        peer: std::net::SocketAddr,
        after: Duration,
    },

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}

impl TransportError {
    /// `true` for errors that concern one peer only. The listener is still
    /// healthy and the accept loop should carry on.
    pub fn is_per_connection(&self) -> bool {
        matches!(
            self,
            Self::HandshakeFailed { .. } | Self::HandshakeTimeout { .. }
        )
    }
}

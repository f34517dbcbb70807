//! Network layer for Lightcycle.
//!
//! [`Transport`] accepts connections and [`Connection`] moves whole
//! messages over one of them. Both deal only in bytes: framing is the
//! transport's job, and what the bytes mean is the protocol crate's.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket listener via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{DEFAULT_HANDSHAKE_TIMEOUT, WebSocketConnection, WebSocketTransport};

use std::fmt;
use std::net::SocketAddr;

/// Process-unique identifier for a connection, used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next peer and completes any protocol handshake.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// The address actually bound. Useful after binding port 0.
    fn local_addr(&self) -> Result<SocketAddr, Self::Error>;
}

/// One established connection carrying whole messages.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    /// Sends one message to the peer.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Receives the next message from the peer.
    ///
    /// Returns `Ok(None)` when the peer closed the connection.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Starts a clean close.
    async fn close(&self) -> Result<(), Self::Error>;

    fn id(&self) -> ConnectionId;

    /// The remote address the connection came from.
    fn peer_addr(&self) -> SocketAddr;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_display() {
        assert_eq!(ConnectionId::new(7).to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_round_trips_raw_value() {
        assert_eq!(ConnectionId::new(42).into_inner(), 42);
    }

    #[test]
    fn test_transport_error_per_connection_classification() {
        let peer: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let timeout = TransportError::HandshakeTimeout {
            peer,
            after: std::time::Duration::from_secs(5),
        };
        let accept = TransportError::AcceptFailed(std::io::Error::other("too many open files"));

        assert!(timeout.is_per_connection());
        assert!(!accept.is_per_connection());
        assert_eq!(
            timeout.to_string(),
            "handshake with 127.0.0.1:9000 timed out after 5s"
        );
    }
}

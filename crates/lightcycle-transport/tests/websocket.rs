//! WebSocket transport over real sockets: a tokio-tungstenite client
//! talks to a listener bound on an ephemeral port.

#[cfg(feature = "websocket")]
mod websocket {
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use lightcycle_transport::{
        Connection, Transport, TransportError, WebSocketConnection, WebSocketTransport,
    };
    use tokio_tungstenite::MaybeTlsStream;
    use tokio_tungstenite::WebSocketStream;
    use tokio_tungstenite::tungstenite::Message;

    type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

    /// Binds on port 0, connects one client, and returns both ends.
    async fn connected_pair() -> (WebSocketConnection, Client) {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("bound address");

        let server = tokio::spawn(async move { transport.accept().await.expect("should accept") });
        let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        let conn = server.await.expect("accept task");
        (conn, client)
    }

    #[tokio::test]
    async fn test_send_utf8_arrives_as_text_frame() {
        let (conn, mut client) = connected_pair().await;

        conn.send(br#"{"seq":1}"#).await.expect("send");

        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg, Message::text(r#"{"seq":1}"#));
    }

    #[tokio::test]
    async fn test_send_non_utf8_arrives_as_binary_frame() {
        let (conn, mut client) = connected_pair().await;

        conn.send(&[0xff, 0x00, 0xfe]).await.expect("send");

        let msg = client.next().await.unwrap().unwrap();
        assert!(msg.is_binary());
        assert_eq!(msg.into_data().as_ref(), &[0xff, 0x00, 0xfe]);
    }

    #[tokio::test]
    async fn test_recv_accepts_text_and_binary_and_skips_pings() {
        let (conn, mut client) = connected_pair().await;

        client.send(Message::text("hello")).await.unwrap();
        client.send(Message::Ping(Vec::new().into())).await.unwrap();
        client.send(Message::binary(b"world".to_vec())).await.unwrap();

        assert_eq!(conn.recv().await.unwrap().unwrap(), b"hello");
        assert_eq!(conn.recv().await.unwrap().unwrap(), b"world");
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_client_close() {
        let (conn, mut client) = connected_pair().await;

        client.send(Message::Close(None)).await.unwrap();

        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_accept_reports_peer_and_distinct_ids() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0").await.unwrap();
        let addr = transport.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let a = transport.accept().await.unwrap();
            let b = transport.accept().await.unwrap();
            (a, b)
        });
        let (_c1, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .unwrap();
        let (_c2, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .unwrap();
        let (a, b) = server.await.unwrap();

        assert_ne!(a.id(), b.id());
        assert!(a.peer_addr().ip().is_loopback());
    }

    #[tokio::test]
    async fn test_accept_times_out_on_silent_peer() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .unwrap()
            .with_handshake_timeout(Duration::from_millis(100));
        let addr = transport.local_addr().unwrap();

        // A raw TCP connection that never sends the HTTP upgrade.
        let _silent = tokio::net::TcpStream::connect(addr).await.unwrap();

        let err = match transport.accept().await {
            Ok(_) => panic!("handshake should not complete"),
            Err(err) => err,
        };
        assert!(matches!(err, TransportError::HandshakeTimeout { .. }));
        assert!(err.is_per_connection());
    }
}

//! `LightcycleServer` builder and accept loop.
//!
//! The server owns one [`GameEngine`] shared by every connection, starts
//! the [`ExpiryReaper`] next to the accept loop, and hands each accepted
//! client to its own handler task.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use lightcycle_game::{ExpiryReaper, GameConfig, GameEngine};
use lightcycle_protocol::{Codec, JsonCodec};
use lightcycle_session::SessionConfig;
use lightcycle_transport::{Connection, Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{LightcycleError, ServerConfig};

/// State shared by every connection task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) engine: Arc<GameEngine>,
    pub(crate) codec: C,
    pub(crate) idle_timeout: Duration,
}

/// Builder for configuring and starting a server.
///
/// # Example
///
/// ```rust,ignore
/// let server = LightcycleServer::builder()
///     .bind("0.0.0.0:6008")
///     .game_config(GameConfig { grid_size: 60, ..GameConfig::default() })
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct LightcycleServerBuilder {
    server_config: ServerConfig,
    game_config: GameConfig,
    session_config: SessionConfig,
}

impl LightcycleServerBuilder {
    pub fn new() -> Self {
        Self {
            server_config: ServerConfig::default(),
            game_config: GameConfig::default(),
            session_config: SessionConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.server_config.bind_addr = addr.to_owned();
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.server_config.idle_timeout = timeout;
        self
    }

    pub fn server_config(mut self, config: ServerConfig) -> Self {
        self.server_config = config;
        self
    }

    pub fn game_config(mut self, config: GameConfig) -> Self {
        self.game_config = config;
        self
    }

    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Binds the listener and creates the engine.
    ///
    /// # Errors
    /// Fails only if the address can't be bound.
    pub async fn build(self) -> Result<LightcycleServer<JsonCodec>, LightcycleError> {
        let transport = WebSocketTransport::bind(self.server_config.bind_addr.as_str()).await?;
        let engine = Arc::new(GameEngine::new(self.game_config, self.session_config));

        let state = Arc::new(ServerState {
            engine,
            codec: JsonCodec,
            idle_timeout: self.server_config.idle_timeout,
        });

        Ok(LightcycleServer { transport, state })
    }
}

impl Default for LightcycleServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound server. Call [`run()`](Self::run) to start accepting players.
pub struct LightcycleServer<C: Codec = JsonCodec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl LightcycleServer<JsonCodec> {
    pub fn builder() -> LightcycleServerBuilder {
        LightcycleServerBuilder::new()
    }
}

impl<C: Codec> LightcycleServer<C> {
    /// The address actually bound. Useful after binding port 0.
    pub fn local_addr(&self) -> Result<SocketAddr, LightcycleError> {
        Ok(self.transport.local_addr()?)
    }

    /// The shared engine, for embedding and inspection.
    pub fn engine(&self) -> &Arc<GameEngine> {
        &self.state.engine
    }

    /// Starts the expiry reaper and runs the accept loop.
    ///
    /// Failed handshakes and failed accepts are logged and skipped; this
    /// only returns if the process is torn down around it.
    pub async fn run(mut self) -> Result<(), LightcycleError> {
        let addr = self.local_addr()?;
        let engine = &self.state.engine;
        engine.record(format!("Light Cycle Racer server starting on {addr}"));
        engine.record(format!("Game available at: ws://{addr}"));

        let _reaper = ExpiryReaper::new(Arc::clone(engine)).spawn();

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        let conn_id = conn.id();
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(%conn_id, error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) if e.is_per_connection() => {
                    tracing::debug!(error = %e, "handshake failed");
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

//! # Lightcycle
//!
//! Server-authoritative backend for a single-player light-cycle game.
//!
//! The client renders and steers; the server records every move, checks
//! its timing, and decides whether the crash the client reports actually
//! happened before awarding a score. Clients talk to it over WebSocket
//! using the JSON messages in [`lightcycle_protocol`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lightcycle::prelude::*;
//!
//! # async fn start() -> Result<(), LightcycleError> {
//! let server = LightcycleServer::builder()
//!     .bind("0.0.0.0:6008")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{BIND_ENV, IDLE_TIMEOUT_ENV, ServerConfig};
pub use error::LightcycleError;
pub use server::{LightcycleServer, LightcycleServerBuilder};

/// Everything needed to embed or drive a server.
pub mod prelude {
    pub use crate::{LightcycleError, LightcycleServer, LightcycleServerBuilder, ServerConfig};
    pub use lightcycle_game::{GameConfig, GameEngine, GameError, GameState, ScoreOutcome};
    pub use lightcycle_protocol::{Envelope, Position, Request, Response, SessionId};
    pub use lightcycle_session::SessionConfig;
}

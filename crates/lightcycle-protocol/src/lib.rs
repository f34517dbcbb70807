//! Wire protocol for Lightcycle.
//!
//! This crate defines the "language" that a light-cycle client and the
//! server speak:
//!
//! - **Types** ([`Request`], [`Response`], [`Envelope`], [`Position`],
//!   [`SessionId`]): the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those structures
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the game
//! core. It doesn't know about sessions or scores; it only knows how to
//! serialize and deserialize the five game operations and their replies.
//!
//! ```text
//! Transport (bytes) → Protocol (Envelope<Request>) → Game engine
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{Envelope, Position, Request, Response, SessionId};

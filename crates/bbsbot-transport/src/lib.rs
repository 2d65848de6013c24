//! bbsbot transport layer
//!
//! Everything between the wire and the session engine: the WebSocket
//! connection, the quiet-period framer that coalesces inbound byte chunks
//! into logical messages, and the charset codec that moves text across the
//! session's active encoding.

pub mod charset;
pub mod error;
pub mod framer;
pub mod ws;

pub use charset::Charset;
pub use error::{Result, TransportError};
pub use framer::spawn_framer;
pub use ws::{Transport, TransportEvent, WsTransport};

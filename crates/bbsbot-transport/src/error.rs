//! Transport error types

use thiserror::Error;

/// Transport result type
pub type Result<T> = std::result::Result<T, TransportError>;

/// Transport errors
///
/// `FrameTooLarge` is fatal for the session and is surfaced through the
/// transport event channel rather than silently dropped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Inbound frame of {size} bytes exceeds limit of {limit} bytes")]
    FrameTooLarge { size: usize, limit: usize },

    #[error("Unknown charset: {0}")]
    UnsupportedCharset(String),

    #[error("Not connected")]
    NotConnected,

    #[error("WebSocket error: {0}")]
    WebSocket(String),
}

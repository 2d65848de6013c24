//! Client error types
//!
//! The split mirrors the propagation policy: transport and configuration
//! failures are hard errors, while protocol-level ambiguity (unrecognized
//! prompts, command timeouts, failed navigation) stays in boolean or
//! `Option` return values and never escalates to an `Err`.

use thiserror::Error;

use bbsbot_config::ConfigError;
use bbsbot_transport::TransportError;

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Session-level errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not connected")]
    NotConnected,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Query-execution errors
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Missing predicate: {0}")]
    MissingPredicate(&'static str),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Unknown board entry: {0}")]
    UnknownEntry(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

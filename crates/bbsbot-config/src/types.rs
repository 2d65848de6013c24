//! Core configuration types

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Client configuration
///
/// Every field has a default aimed at the public PTT WebSocket endpoint;
/// construct with `ClientConfig::default()` and override what differs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Service display name
    pub name: String,
    /// WebSocket endpoint address
    pub url: String,
    /// Origin header sent on the WebSocket handshake
    pub origin: String,
    /// Transport kind; only the WebSocket family is supported
    pub protocol: String,
    /// Target charset for the session ("utf8" or "big5")
    pub charset: String,
    /// Quiet-period reassembly window in milliseconds; also the base unit
    /// for the per-command timeout (command timeout = 10x this value)
    pub timeout_ms: u64,
    /// Maximum accepted size of a single inbound frame in bytes
    pub max_frame_bytes: usize,
    /// Idle-prevention timeout in seconds; 0 disables the keep-alive
    pub prevent_idle_secs: u64,
    /// Terminal grid dimensions
    pub terminal: TerminalGeometry,
}

/// Terminal grid dimensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TerminalGeometry {
    /// Grid width in character cells
    pub columns: u16,
    /// Grid height in rows
    pub rows: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: "PTT".to_string(),
            url: "wss://ws.ptt.cc/bbs".to_string(),
            origin: "app://pcman".to_string(),
            protocol: "websocket".to_string(),
            charset: "utf8".to_string(),
            timeout_ms: 200,
            max_frame_bytes: 1024,
            prevent_idle_secs: 30,
            terminal: TerminalGeometry::default(),
        }
    }
}

impl Default for TerminalGeometry {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 24,
        }
    }
}

impl ClientConfig {
    /// Validate the configuration
    ///
    /// An unsupported transport kind is fatal at construction time, so the
    /// session constructor calls this before opening anything.
    pub fn validate(&self) -> Result<()> {
        match self.protocol.to_lowercase().as_str() {
            "websocket" | "ws" | "wss" => {}
            other => return Err(ConfigError::UnsupportedProtocol(other.to_string())),
        }
        if self.terminal.columns == 0 || self.terminal.rows == 0 {
            return Err(ConfigError::Validation(
                "Terminal dimensions must be non-zero".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Reassembly timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

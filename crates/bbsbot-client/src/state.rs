//! Session state snapshots
//!
//! The engine owns its mutable state and publishes an immutable snapshot
//! through the event bus on every change; subscribers must treat each
//! received snapshot as frozen at publication time.

use serde::{Deserialize, Serialize};

/// Full session state snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SessionState {
    /// Transport connection established
    pub connected: bool,
    /// Login handshake completed
    pub logged_in: bool,
    /// Current navigation position
    pub position: Position,
}

/// Navigation position within the remote menu tree
///
/// `None` before login; `Some("")` at the index/root screen; `Some(name)`
/// inside a board. Failed navigation always restores the root value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Position {
    pub boardname: Option<String>,
}

impl Position {
    /// Position at the index/root screen
    pub fn index() -> Self {
        Self {
            boardname: Some(String::new()),
        }
    }

    /// Position inside the named board
    pub fn board(name: impl Into<String>) -> Self {
        Self {
            boardname: Some(name.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_disconnected() {
        let state = SessionState::default();
        assert!(!state.connected);
        assert!(!state.logged_in);
        assert_eq!(state.position.boardname, None);
    }

    #[test]
    fn test_position_constructors() {
        assert_eq!(Position::index().boardname.as_deref(), Some(""));
        assert_eq!(Position::board("Gossiping").boardname.as_deref(), Some("Gossiping"));
    }
}

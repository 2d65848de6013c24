//! Typed session event bus
//!
//! Transport events relayed through the session, screen redraws, state
//! snapshots, and login outcomes are all published as one closed event
//! enum over a tokio broadcast channel. Each event carries its full
//! payload; subscribers filter what they need.

use tokio::sync::broadcast;

use crate::state::SessionState;

/// Channel capacity for broadcast events
const CHANNEL_CAPACITY: usize = 256;

/// Events published by a session
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Transport connection established
    Connected,
    /// Transport connection dropped
    Disconnected,
    /// One complete inbound logical message, raw bytes
    Message { raw: Vec<u8> },
    /// Full rendered screen after applying an inbound message
    Redraw { screen: String },
    /// Session state snapshot, published on every mutation
    StateChange { state: SessionState },
    /// Login handshake succeeded
    LoginSuccess,
    /// Login handshake failed
    LoginFailed,
    /// Fatal transport failure
    Error { message: String },
}

/// Broadcast bus for session events
///
/// Cloning shares the underlying channel. Publishing with no subscribers
/// is a no-op, so the session never blocks on an unobserved bus.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Create a bus with the default capacity
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to all session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all current subscribers
    pub fn publish(&self, event: SessionEvent) {
        let _ = self.sender.send(event);
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_subscribe() {
        let bus = EventBus::new();
        let mut subscriber = bus.subscribe();

        bus.publish(SessionEvent::Connected);

        match subscriber.recv().await.unwrap() {
            SessionEvent::Connected => {}
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_state_change_carries_snapshot() {
        let bus = EventBus::new();
        let mut subscriber = bus.subscribe();

        let mut state = SessionState::default();
        state.connected = true;
        bus.publish(SessionEvent::StateChange {
            state: state.clone(),
        });

        match subscriber.recv().await.unwrap() {
            SessionEvent::StateChange { state: received } => assert_eq!(received, state),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(SessionEvent::LoginFailed);
    }
}

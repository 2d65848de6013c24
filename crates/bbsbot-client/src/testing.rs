//! Scripted transport for driving a session in tests
//!
//! `ScriptedTransport` records every transmitted payload and answers each
//! transmission with the next scripted batch of transport events, which is
//! how the prompt-by-prompt handshake and navigation flows are exercised
//! without a live endpoint.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use bbsbot_config::ClientConfig;
use bbsbot_transport::{Charset, Transport, TransportError, TransportEvent};

use crate::session::Session;

pub(crate) struct ScriptedTransport {
    pub(crate) sent: Mutex<Vec<Vec<u8>>>,
    script: Mutex<VecDeque<Vec<TransportEvent>>>,
    events: Option<mpsc::Sender<TransportEvent>>,
}

impl ScriptedTransport {
    fn new(events: mpsc::Sender<TransportEvent>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            events: Some(events),
        }
    }

    /// Transport that only records, with no event channel
    pub(crate) fn detached() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            events: None,
        }
    }
}

impl Transport for ScriptedTransport {
    fn transmit(&self, bytes: Vec<u8>) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(bytes);
        let response = self.script.lock().unwrap().pop_front();
        if let (Some(events), Some(response)) = (&self.events, response) {
            for event in response {
                events.try_send(event).expect("scripted event channel full");
            }
        }
        Ok(())
    }

    fn shutdown(&self) {}
}

/// Test-side handle to a scripted session
pub(crate) struct ScriptHandle {
    pub(crate) transport: Arc<ScriptedTransport>,
    events: mpsc::Sender<TransportEvent>,
}

impl ScriptHandle {
    /// Queue the reply to the next transmission: each payload becomes one
    /// inbound logical message
    pub(crate) fn respond(&self, payloads: Vec<Vec<u8>>) {
        let events = payloads.into_iter().map(TransportEvent::Message).collect();
        self.transport.script.lock().unwrap().push_back(events);
    }

    /// Deliver a transport event directly, outside any correlation
    pub(crate) async fn push(&self, event: TransportEvent) {
        self.events.send(event).await.unwrap();
    }

    /// Decoded text of the `i`-th transmitted payload
    pub(crate) fn sent_text(&self, i: usize) -> String {
        let sent = self.transport.sent.lock().unwrap();
        Charset::Big5.decode(&sent[i])
    }

    /// Number of transmissions so far
    pub(crate) fn sent_count(&self) -> usize {
        self.transport.sent.lock().unwrap().len()
    }
}

impl std::ops::Deref for ScriptHandle {
    type Target = ScriptedTransport;

    fn deref(&self) -> &Self::Target {
        &self.transport
    }
}

/// Connected session over a scripted transport, default configuration
pub(crate) async fn scripted_session() -> (Session, ScriptHandle) {
    scripted_session_with(ClientConfig::default()).await
}

pub(crate) async fn scripted_session_with(config: ClientConfig) -> (Session, ScriptHandle) {
    let (event_tx, event_rx) = mpsc::channel(64);
    let transport = Arc::new(ScriptedTransport::new(event_tx.clone()));
    let mut session = Session::with_transport(config, transport.clone(), event_rx).unwrap();

    event_tx.send(TransportEvent::Connected).await.unwrap();
    session.wait_connected().await.unwrap();

    (
        session,
        ScriptHandle {
            transport,
            events: event_tx,
        },
    )
}

/// Build one inbound message that clears the screen and paints the given
/// rows (0-indexed), encoded under the session's legacy default charset
pub(crate) fn screen_message(rows: &[(usize, &str)]) -> Vec<u8> {
    let mut text = String::from("\x1b[2J\x1b[H");
    for (row, content) in rows {
        text.push_str(&format!("\x1b[{};1H{}", row + 1, content));
    }
    Charset::Big5.encode(&text)
}

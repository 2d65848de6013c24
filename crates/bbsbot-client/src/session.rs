//! Session engine
//!
//! Owns connection/login/position state, the rendered screen, and the
//! active charset; forwards transport events; and serializes command
//! execution through `send`. One session is driven by one control flow at
//! a time: at most one command may be awaiting its correlated inbound
//! message, and issuing another before that resolves is a caller error.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use bbsbot_config::ClientConfig;
use bbsbot_terminal::keymap;
use bbsbot_terminal::{ScreenLine, TerminalScreen};
use bbsbot_transport::{Charset, Transport, TransportEvent, TransportError, WsTransport};

use crate::error::{ClientError, Result};
use crate::events::{EventBus, SessionEvent};
use crate::login;
use crate::state::{Position, SessionState};

/// One automated session against the remote service
pub struct Session {
    pub(crate) config: ClientConfig,
    pub(crate) state: SessionState,
    pub(crate) screen: TerminalScreen,
    /// Charset currently used to decode inbound and encode outbound text;
    /// starts at the legacy default and may switch once, pre-login
    pub(crate) active_charset: Charset,
    /// Charset the configuration asks for
    pub(crate) target_charset: Charset,
    bus: EventBus,
    transport: Arc<dyn Transport>,
    inbound: mpsc::Receiver<TransportEvent>,
    keepalive: Option<mpsc::UnboundedSender<KeepaliveSignal>>,
}

impl Session {
    /// Connect to the configured endpoint over WebSocket.
    ///
    /// Validates the configuration and charset first; both are fatal at
    /// construction. Returns once the connection is established.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        config.validate().map_err(ClientError::Config)?;
        let (transport, inbound) = WsTransport::connect(&config).await?;
        let mut session = Self::with_transport(config, Arc::new(transport), inbound)?;
        session.wait_connected().await?;
        Ok(session)
    }

    /// Build a session over an already-established transport.
    ///
    /// The transport's `Connected` event must still be delivered through
    /// `inbound`; `wait_connected` consumes events until it arrives.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        inbound: mpsc::Receiver<TransportEvent>,
    ) -> Result<Self> {
        config.validate().map_err(ClientError::Config)?;
        let target_charset = Charset::from_str(&config.charset)?;

        let keepalive = if config.prevent_idle_secs > 0 {
            Some(spawn_keepalive(
                Arc::clone(&transport),
                Duration::from_secs(config.prevent_idle_secs),
            ))
        } else {
            None
        };

        Ok(Self {
            screen: TerminalScreen::new(config.terminal.columns, config.terminal.rows),
            state: SessionState::default(),
            active_charset: Charset::Big5,
            target_charset,
            bus: EventBus::new(),
            transport,
            inbound,
            keepalive,
            config,
        })
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.bus.subscribe()
    }

    /// Current state snapshot
    pub fn state(&self) -> SessionState {
        self.state.clone()
    }

    /// Snapshot of screen row `n`
    pub fn line(&self, n: usize) -> ScreenLine {
        self.screen.line(n)
    }

    /// Snapshot of the whole screen grid
    pub fn screen_lines(&self) -> Vec<ScreenLine> {
        self.screen.lines()
    }

    /// Full screen text
    pub fn screen_text(&self) -> String {
        self.screen.contents()
    }

    /// Process inbound events until the transport reports `Connected`
    pub async fn wait_connected(&mut self) -> Result<()> {
        while !self.state.connected {
            match self.inbound.recv().await {
                Some(event) => {
                    self.handle_event(event);
                }
                None => return Err(ClientError::NotConnected),
            }
        }
        Ok(())
    }

    /// Execute one outbound command.
    ///
    /// Encodes `command` under the active charset, transmits it, and arms a
    /// correlation against the next inbound message. Resolves `true` if a
    /// message arrives within the command timeout (10x the base timeout)
    /// and `false` otherwise; a timeout is not an error. Fails immediately
    /// with `NotConnected` when the session is disconnected.
    pub async fn send(&mut self, command: &str) -> Result<bool> {
        if !self.state.connected {
            return Err(ClientError::NotConnected);
        }
        self.reset_keepalive();
        if command.is_empty() {
            return Ok(true);
        }
        let bytes = self.active_charset.encode(command);
        self.transport.transmit(bytes)?;

        let deadline = Duration::from_millis(self.config.timeout_ms * 10);
        let answered = tokio::time::timeout(deadline, self.await_message())
            .await
            .unwrap_or(false);
        Ok(answered)
    }

    /// Apply queued inbound events without blocking
    pub(crate) fn drain_pending(&mut self) {
        while let Ok(event) = self.inbound.try_recv() {
            self.handle_event(event);
        }
    }

    async fn await_message(&mut self) -> bool {
        loop {
            match self.inbound.recv().await {
                Some(event) => {
                    if self.handle_event(event) {
                        return true;
                    }
                    if !self.state.connected {
                        return false;
                    }
                }
                None => {
                    self.mark_disconnected();
                    return false;
                }
            }
        }
    }

    /// Returns `true` when the event was a logical message
    fn handle_event(&mut self, event: TransportEvent) -> bool {
        match event {
            TransportEvent::Connected => {
                if !self.state.connected {
                    self.state.connected = true;
                    self.bus.publish(SessionEvent::Connected);
                    self.emit_state();
                }
                false
            }
            TransportEvent::Disconnected => {
                self.mark_disconnected();
                false
            }
            TransportEvent::Error(error) => {
                warn!(%error, "transport error");
                self.bus.publish(SessionEvent::Error {
                    message: error.to_string(),
                });
                if matches!(error, TransportError::FrameTooLarge { .. }) {
                    // fatal for the session
                    self.transport.shutdown();
                    self.mark_disconnected();
                }
                false
            }
            TransportEvent::Message(raw) => {
                self.apply_message(raw);
                true
            }
        }
    }

    fn mark_disconnected(&mut self) {
        if self.state.connected {
            self.state.connected = false;
            self.bus.publish(SessionEvent::Disconnected);
            self.emit_state();
        }
    }

    fn apply_message(&mut self, raw: Vec<u8>) {
        // The banner arrives under the legacy charset; if the configured
        // target differs, sniff each pre-login message under UTF-8 for the
        // banner sentinel and switch permanently when it shows up.
        if self.active_charset != self.target_charset && !self.state.logged_in {
            let probe = Charset::Utf8.decode(&raw);
            if probe.contains(login::BANNER_SENTINEL) {
                debug!(from = %self.active_charset, to = %self.target_charset, "switching session charset");
                self.active_charset = self.target_charset;
            }
        }
        let text = self.active_charset.decode(&raw);
        self.screen.write(&text);
        self.bus.publish(SessionEvent::Message { raw });
        self.bus.publish(SessionEvent::Redraw {
            screen: self.screen.contents(),
        });
    }

    pub(crate) fn emit_state(&self) {
        self.bus.publish(SessionEvent::StateChange {
            state: self.state.clone(),
        });
    }

    pub(crate) fn publish(&self, event: SessionEvent) {
        self.bus.publish(event);
    }

    /// Log into the service.
    ///
    /// `kick` controls the answer to the duplicate-connection prompt.
    /// Returns `false` when the handshake ends in rejection; an ambiguous
    /// handshake keeps polling and never returns an error.
    pub async fn login(&mut self, username: &str, password: &str, kick: bool) -> Result<bool> {
        if self.state.logged_in {
            return Ok(true);
        }
        // a literal comma cannot survive the account field; when the target
        // charset is UTF-8 a trailing comma marks the username as such
        let mut username = username.replace(',', "");
        if self.target_charset == Charset::Utf8 {
            username.push(',');
        }
        self.send(&format!(
            "{username}{enter}{password}{enter}",
            enter = keymap::ENTER
        ))
        .await?;

        let ok = login::run_handshake(self, kick).await?;
        if ok {
            self.state.logged_in = true;
            self.state.position = Position::index();
            self.emit_state();
            self.enable_keepalive();
        }
        Ok(ok)
    }

    /// Log out of the service
    pub async fn logout(&mut self) -> Result<bool> {
        if !self.state.logged_in {
            return Ok(true);
        }
        self.send(&format!("G{e}Y{e}", e = keymap::ENTER)).await?;
        self.state.logged_in = false;
        self.state.position = Position::default();
        self.disable_keepalive();
        self.emit_state();
        let _ = self.send(keymap::ENTER).await;
        Ok(true)
    }

    fn enable_keepalive(&self) {
        if let Some(tx) = &self.keepalive {
            let payload = self
                .active_charset
                .encode(&format!("{}{}", keymap::CTRL_U, keymap::ARROW_LEFT));
            let _ = tx.send(KeepaliveSignal::Enable { payload });
        }
    }

    fn disable_keepalive(&self) {
        if let Some(tx) = &self.keepalive {
            let _ = tx.send(KeepaliveSignal::Disable);
        }
    }

    fn reset_keepalive(&self) {
        if let Some(tx) = &self.keepalive {
            let _ = tx.send(KeepaliveSignal::Reset);
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("active_charset", &self.active_charset)
            .finish_non_exhaustive()
    }
}

pub(crate) enum KeepaliveSignal {
    /// A command went out; push the idle deadline back
    Reset,
    /// Arm the timer with the encoded no-op keystrokes
    Enable { payload: Vec<u8> },
    Disable,
}

/// Idle-prevention timer task.
///
/// The only autonomous activity in a session: once armed, if no command is
/// sent for `idle` the no-op keystrokes go straight to the transport. They
/// bypass the pending-request correlation on purpose, so autonomous
/// traffic can never consume a real command's response.
pub(crate) fn spawn_keepalive(
    transport: Arc<dyn Transport>,
    idle: Duration,
) -> mpsc::UnboundedSender<KeepaliveSignal> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut armed: Option<Vec<u8>> = None;
        loop {
            if let Some(payload) = armed.clone() {
                match tokio::time::timeout(idle, rx.recv()).await {
                    Ok(Some(KeepaliveSignal::Reset)) => {}
                    Ok(Some(KeepaliveSignal::Enable { payload })) => armed = Some(payload),
                    Ok(Some(KeepaliveSignal::Disable)) => armed = None,
                    Ok(None) => break,
                    Err(_) => {
                        debug!("idle timeout elapsed, sending keep-alive keystrokes");
                        if transport.transmit(payload).is_err() {
                            break;
                        }
                    }
                }
            } else {
                match rx.recv().await {
                    Some(KeepaliveSignal::Enable { payload }) => armed = Some(payload),
                    Some(_) => {}
                    None => break,
                }
            }
        }
    });
    tx
}

//! WebSocket transport
//!
//! Owns the socket and splits it into a write task draining an outbound
//! channel and a read task feeding the quiet-period framer. The session
//! engine consumes the resulting `TransportEvent` stream; it never touches
//! the socket directly. A scripted `Transport` implementation can stand in
//! for the socket in tests.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use bbsbot_config::ClientConfig;

use crate::error::TransportError;
use crate::framer::spawn_framer;

/// Events delivered from the transport to the session engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection is established
    Connected,
    /// The connection dropped, gracefully or not
    Disconnected,
    /// One complete logical message, as reassembled by the framer
    Message(Vec<u8>),
    /// Fatal transport failure
    Error(TransportError),
}

/// Outbound half of a transport
///
/// Kept deliberately small so tests can drive the session with a scripted
/// implementation.
pub trait Transport: Send + Sync {
    /// Queue raw bytes for transmission
    fn transmit(&self, bytes: Vec<u8>) -> Result<(), TransportError>;

    /// Close the connection
    fn shutdown(&self);
}

enum WsCommand {
    Send(Vec<u8>),
    Close,
}

/// WebSocket-backed transport
pub struct WsTransport {
    out_tx: mpsc::UnboundedSender<WsCommand>,
}

impl WsTransport {
    /// Connect to the configured endpoint.
    ///
    /// Returns the outbound handle and the inbound event stream. A
    /// `Connected` event is already queued on the stream when this returns.
    pub async fn connect(
        config: &ClientConfig,
    ) -> Result<(Self, mpsc::Receiver<TransportEvent>), TransportError> {
        let mut request = config
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| TransportError::WebSocket(e.to_string()))?;
        if !config.origin.is_empty() {
            let origin = HeaderValue::from_str(&config.origin)
                .map_err(|e| TransportError::WebSocket(e.to_string()))?;
            request.headers_mut().insert("Origin", origin);
        }

        let (socket, _) = connect_async(request)
            .await
            .map_err(|e| TransportError::WebSocket(e.to_string()))?;
        debug!(url = %config.url, "websocket connected");

        let (mut sink, mut stream) = socket.split();
        let (event_tx, event_rx) = mpsc::channel(64);
        let (chunk_tx, chunk_rx) = mpsc::channel(64);
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();

        spawn_framer(
            chunk_rx,
            event_tx.clone(),
            Duration::from_millis(config.timeout_ms),
            config.max_frame_bytes,
        );

        let _ = event_tx.send(TransportEvent::Connected).await;

        // read side: raw frames into the framer
        tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Binary(data)) => {
                        if chunk_tx.send(data).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Text(text)) => {
                        if chunk_tx.send(text.into_bytes()).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "websocket read failed");
                        let _ = event_tx
                            .send(TransportEvent::Error(TransportError::WebSocket(
                                e.to_string(),
                            )))
                            .await;
                        break;
                    }
                }
            }
            let _ = event_tx.send(TransportEvent::Disconnected).await;
        });

        // write side: outbound channel onto the socket
        tokio::spawn(async move {
            while let Some(command) = out_rx.recv().await {
                match command {
                    WsCommand::Send(bytes) => {
                        if sink.send(Message::Binary(bytes)).await.is_err() {
                            break;
                        }
                    }
                    WsCommand::Close => {
                        let _ = sink.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
        });

        Ok((Self { out_tx }, event_rx))
    }
}

impl Transport for WsTransport {
    fn transmit(&self, bytes: Vec<u8>) -> Result<(), TransportError> {
        self.out_tx
            .send(WsCommand::Send(bytes))
            .map_err(|_| TransportError::NotConnected)
    }

    fn shutdown(&self) {
        let _ = self.out_tx.send(WsCommand::Close);
    }
}

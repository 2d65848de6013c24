//! Quiet-period message framing
//!
//! The remote service streams a redraw as several small binary chunks with
//! no length prefix or terminator. The only reliable message boundary is
//! silence: chunks are accumulated until no further chunk arrives within
//! the configured quiet-period window, then the accumulated buffer is
//! emitted as one logical message.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, trace};

use crate::error::TransportError;
use crate::ws::TransportEvent;

/// Spawn the framing task.
///
/// Reads raw chunks from `chunks` and emits `TransportEvent::Message` on
/// `events` once per quiet-period-separated group. A single chunk larger
/// than `max_frame_bytes` is fatal: a `FrameTooLarge` error event is
/// emitted and the task stops. When the chunk channel closes, any
/// partially accumulated buffer is flushed before the task ends.
pub fn spawn_framer(
    mut chunks: mpsc::Receiver<Vec<u8>>,
    events: mpsc::Sender<TransportEvent>,
    quiet_period: Duration,
    max_frame_bytes: usize,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::new();
        loop {
            let chunk = if buf.is_empty() {
                match chunks.recv().await {
                    Some(chunk) => Some(chunk),
                    None => break,
                }
            } else {
                match tokio::time::timeout(quiet_period, chunks.recv()).await {
                    Ok(Some(chunk)) => Some(chunk),
                    Ok(None) => {
                        let _ = events.send(TransportEvent::Message(std::mem::take(&mut buf))).await;
                        break;
                    }
                    Err(_) => {
                        trace!(bytes = buf.len(), "quiet period elapsed, emitting message");
                        if events
                            .send(TransportEvent::Message(std::mem::take(&mut buf)))
                            .await
                            .is_err()
                        {
                            break;
                        }
                        None
                    }
                }
            };

            if let Some(chunk) = chunk {
                if chunk.len() > max_frame_bytes {
                    error!(
                        size = chunk.len(),
                        limit = max_frame_bytes,
                        "inbound frame exceeds size limit"
                    );
                    let _ = events
                        .send(TransportEvent::Error(TransportError::FrameTooLarge {
                            size: chunk.len(),
                            limit: max_frame_bytes,
                        }))
                        .await;
                    break;
                }
                buf.extend_from_slice(&chunk);
            }
        }
    })
}

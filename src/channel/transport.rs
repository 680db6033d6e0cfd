use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::client::TransportHandle;
use super::types::ServerFrame;

const RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Drive a [`PushChannel`] over a WebSocket connection.
///
/// Reconnects with a fixed delay until the task is aborted or the channel is
/// dropped. Every drop surfaces as a `Connected(false)` event and nothing
/// else; redoing the joins is the consumer's job on the following
/// `Connected(true)`.
///
/// [`PushChannel`]: super::client::PushChannel
pub async fn run(ws_url: String, token: String, handle: TransportHandle) {
    let (pump, mut commands) = handle.into_parts();
    let url = format!("{}?token={}", ws_url, token);

    loop {
        let ws = match connect_async(&url).await {
            Ok((ws, _)) => ws,
            Err(e) => {
                tracing::warn!("WebSocket connect failed: {}", e);
                tokio::time::sleep(RECONNECT_DELAY).await;
                continue;
            }
        };
        tracing::info!("WebSocket connected");
        pump.set_connected(true);

        let (mut sink, mut stream) = ws.split();
        loop {
            tokio::select! {
                frame = commands.recv() => {
                    // All senders dropped means the channel itself is gone.
                    let Some(frame) = frame else { return };
                    match serde_json::to_string(&frame) {
                        Ok(json) => {
                            if sink.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => tracing::warn!("failed to encode frame: {}", e),
                    }
                }
                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<ServerFrame>(&text) {
                                Ok(frame) => pump.deliver(frame),
                                Err(e) => tracing::warn!("unrecognized frame: {}", e),
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!("WebSocket error: {}", e);
                            break;
                        }
                    }
                }
            }
        }

        pump.set_connected(false);
        tracing::info!("WebSocket disconnected, retrying in {:?}", RECONNECT_DELAY);
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

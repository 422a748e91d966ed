//! WebSocket transport over `tokio-tungstenite`

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::{Channel, Connector, TransportError, TransportEvent, FRAME_BUFFER_SIZE};

/// Connects with `ws://` or `wss://` URLs
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl WsConnector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, endpoint: &str) -> Result<Channel, TransportError> {
        if !(endpoint.starts_with("ws://") || endpoint.starts_with("wss://")) {
            return Err(TransportError::InvalidEndpoint(endpoint.to_string()));
        }

        let (socket, _response) = connect_async(endpoint)
            .await
            .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;

        tracing::debug!(endpoint = %endpoint, "WebSocket connection established");

        let (mut ws_sink, mut ws_stream) = socket.split();
        let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(FRAME_BUFFER_SIZE);
        let (inbound_tx, inbound_rx) = mpsc::channel::<TransportEvent>(FRAME_BUFFER_SIZE);

        // Writer: forwards frames until the session drops its sender
        tokio::spawn(async move {
            while let Some(text) = outbound_rx.recv().await {
                if ws_sink.send(Message::Text(text)).await.is_err() {
                    tracing::warn!("Failed to send frame to WebSocket");
                    break;
                }
            }

            // Close the WebSocket when channel is closed
            let _ = ws_sink.close().await;
        });

        // Reader: forwards text frames and reports how the connection ended
        tokio::spawn(async move {
            let closed = loop {
                match ws_stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        if inbound_tx.send(TransportEvent::Text(text)).await.is_err() {
                            return;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = frame
                            .map(|f| (Some(u16::from(f.code)), f.reason.into_owned()))
                            .unwrap_or((None, String::new()));
                        break TransportEvent::Closed { code, reason };
                    }
                    Some(Ok(Message::Binary(_))) => {
                        tracing::debug!("Binary frames not supported, ignoring");
                    }
                    // Ping/Pong are answered by tungstenite
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "WebSocket error");
                        break TransportEvent::Closed {
                            code: None,
                            reason: e.to_string(),
                        };
                    }
                    None => {
                        break TransportEvent::Closed {
                            code: None,
                            reason: "stream ended".to_string(),
                        };
                    }
                }
            };

            let _ = inbound_tx.send(closed).await;
        });

        Ok(Channel {
            outbound: outbound_tx,
            inbound: inbound_rx,
        })
    }
}

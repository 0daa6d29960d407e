//! Live WebSocket subscription to the monitoring server.
//!
//! [`LiveClient`] holds the connection configuration; [`run`] drives
//! connect / read / reconnect until cancellation or until the retry
//! policy is exhausted. Parsed events are forwarded over an mpsc
//! channel to the UI task, and connection state changes are published
//! on a watch channel for the status indicator.

use futures::{Stream, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use fieldsense_events::messages::{parse_event, ServerEvent};

use crate::reconnect::{reconnect_loop, ReconnectFailure, ReconnectPolicy};

/// Connection state as rendered by the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Live events are flowing.
    Connected,
    /// The transport dropped; a retry is pending.
    Reconnecting { attempt: u32 },
    /// Every retry failed. Terminal — only a restart reconnects.
    Lost,
}

/// Configuration handle for the live connection.
pub struct LiveClient {
    ws_url: String,
}

/// An established WebSocket connection.
pub struct LiveConnection {
    pub ws_stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

/// Errors from the live-connection layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Failed to establish the WebSocket connection.
    #[error("Connection error: {0}")]
    Connection(String),
}

impl LiveClient {
    /// Create a client targeting the server's event endpoint,
    /// e.g. `ws://host:5000/ws`.
    pub fn new(ws_url: String) -> Self {
        Self { ws_url }
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// Establish the WebSocket connection.
    pub async fn connect(&self) -> Result<LiveConnection, ClientError> {
        let (ws_stream, _response) = connect_async(self.ws_url.as_str()).await.map_err(|e| {
            ClientError::Connection(format!("Failed to connect to {}: {e}", self.ws_url))
        })?;

        tracing::info!(url = %self.ws_url, "Live connection established");
        Ok(LiveConnection { ws_stream })
    }
}

/// Drive the live connection until cancellation or terminal loss.
///
/// Each successful connect publishes [`ConnectionState::Connected`] and
/// implicitly resets the retry counter; when a session ends, the
/// reconnect loop takes over. Once the policy's attempt ceiling is hit,
/// [`ConnectionState::Lost`] is published and this function returns.
pub async fn run(
    client: &LiveClient,
    policy: &ReconnectPolicy,
    events: mpsc::Sender<ServerEvent>,
    state: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
) {
    // Initial connect, outside the backoff schedule (page-load connect).
    let mut connection = match client.connect().await {
        Ok(conn) => Some(conn),
        Err(e) => {
            tracing::warn!(error = %e, "Initial connection failed");
            None
        }
    };

    loop {
        let conn = match connection.take() {
            Some(conn) => conn,
            None => {
                let result = reconnect_loop(
                    |attempt| {
                        let _ = state.send(ConnectionState::Reconnecting { attempt });
                        client.connect()
                    },
                    policy,
                    &cancel,
                )
                .await;

                match result {
                    Ok(conn) => conn,
                    Err(ReconnectFailure::AttemptsExhausted) => {
                        let _ = state.send(ConnectionState::Lost);
                        return;
                    }
                    Err(ReconnectFailure::Cancelled) => return,
                }
            }
        };

        let _ = state.send(ConnectionState::Connected);
        run_session(conn.ws_stream, &events, &cancel).await;

        if cancel.is_cancelled() {
            return;
        }
        tracing::warn!("Live session ended, reconnecting");
    }
}

/// Read frames from one established session until it ends.
///
/// Text frames are parsed into [`ServerEvent`]s and forwarded; frames
/// that fail to parse are logged and dropped (at-most-once delivery,
/// nothing is buffered or retried).
async fn run_session<S>(
    mut stream: S,
    events: &mpsc::Sender<ServerEvent>,
    cancel: &CancellationToken,
) where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match parse_event(&text) {
                            Ok(event) => {
                                if events.send(event).await.is_err() {
                                    // UI task is gone; nothing left to feed.
                                    return;
                                }
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, raw = %text, "Unknown or malformed server event");
                            }
                        }
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                        // Handled automatically by tungstenite.
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(?frame, "Server closed the live connection");
                        return;
                    }
                    Some(Ok(_)) => {
                        // Binary / Frame — ignore.
                    }
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Live connection receive error");
                        return;
                    }
                    None => {
                        tracing::info!("Live connection stream exhausted");
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use tokio_tungstenite::tungstenite::Error;

    fn text(frame: &str) -> Result<Message, Error> {
        Ok(Message::Text(frame.to_string()))
    }

    #[tokio::test]
    async fn session_forwards_parsed_events_and_drops_garbage() {
        let frames = stream::iter(vec![
            text(
                r#"{"event": "sensor_data", "data": {
                    "sensor_name": "ph", "value": 7.1, "unit": "pH",
                    "timestamp": "2026-08-28T10:00:00Z"
                }}"#,
            ),
            text("definitely not json"),
            text(r#"{"event": "alert_resolved", "data": {"alert_id": 4}}"#),
        ]);

        let (tx, mut rx) = mpsc::channel(16);
        run_session(frames, &tx, &CancellationToken::new()).await;
        drop(tx);

        let mut channels = Vec::new();
        while let Some(event) = rx.recv().await {
            channels.push(event.channel());
        }
        assert_eq!(channels, ["sensor_data", "alert_resolved"]);
    }

    #[tokio::test]
    async fn session_ends_on_close_frame() {
        let frames = stream::iter(vec![
            Ok(Message::Close(None)),
            text(r#"{"event": "alert_resolved", "data": {"alert_id": 4}}"#),
        ]);

        let (tx, mut rx) = mpsc::channel(16);
        run_session(frames, &tx, &CancellationToken::new()).await;
        drop(tx);

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn run_goes_lost_once_retries_are_exhausted() {
        // Nothing listens on this port, so every connect attempt fails
        // and the retry schedule runs to its ceiling. Paused time skips
        // the backoff delays.
        let client = LiveClient::new("ws://127.0.0.1:9".into());
        let policy = ReconnectPolicy::default();

        let (events_tx, _events_rx) = mpsc::channel(16);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connected);

        run(&client, &policy, events_tx, state_tx, CancellationToken::new()).await;

        assert_eq!(*state_rx.borrow(), ConnectionState::Lost);
    }

    #[tokio::test]
    async fn session_ends_on_receive_error() {
        let frames = stream::iter(vec![
            text(r#"{"event": "alert_resolved", "data": {"alert_id": 1}}"#),
            Err(Error::ConnectionClosed),
            text(r#"{"event": "alert_resolved", "data": {"alert_id": 2}}"#),
        ]);

        let (tx, mut rx) = mpsc::channel(16);
        run_session(frames, &tx, &CancellationToken::new()).await;
        drop(tx);

        let mut count = 0;
        while rx.recv().await.is_some() {
            count += 1;
        }
        assert_eq!(count, 1);
    }
}

//! WebSocket connection and command dispatch loop.
//!
//! This module owns the duplex channel to the browser, including
//! command/response correlation and the per-request timeout policy.
//!
//! # Event Loop
//!
//! The connection spawns a tokio task that handles:
//!
//! - Incoming messages from the browser (responses, events)
//! - Outgoing commands from the client API
//! - Command/response correlation by id
//!
//! A single task owns the socket, so concurrent callers can never
//! interleave partial envelopes on the write path; each caller awaits a
//! dedicated oneshot channel keyed by its command id. Ordering between two
//! outstanding commands is not guaranteed — only id correlation is.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{Value, from_str, to_string};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, error, trace, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::CommandId;
use crate::protocol::{Command, CommandEnvelope, IncomingMessage};

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for command execution.
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum pending commands before rejecting new ones.
const MAX_PENDING_COMMANDS: usize = 100;

// ============================================================================
// Types
// ============================================================================

/// Map of command ids to response channels.
type CorrelationMap = FxHashMap<CommandId, oneshot::Sender<Result<Value>>>;

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    /// Send an envelope and wait for the correlated response.
    Send {
        envelope: CommandEnvelope,
        response_tx: oneshot::Sender<Result<Value>>,
    },
    /// Remove a timed-out correlation entry.
    RemoveCorrelation(CommandId),
    /// Shutdown the connection.
    Shutdown,
}

// ============================================================================
// Connection
// ============================================================================

/// WebSocket connection to the browser's remote end.
///
/// Handles command/response correlation. The connection spawns an internal
/// event loop task that owns the socket.
///
/// # Thread Safety
///
/// `Connection` is `Send + Sync` and can be shared across tasks. Multiple
/// commands may be in flight concurrently.
pub struct Connection {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    /// Correlation map (shared with the event loop).
    correlation: Arc<Mutex<CorrelationMap>>,
}

impl Clone for Connection {
    fn clone(&self) -> Self {
        Self {
            command_tx: self.command_tx.clone(),
            correlation: Arc::clone(&self.correlation),
        }
    }
}

impl Connection {
    /// Creates a connection from an established duplex stream.
    ///
    /// Spawns the event loop task internally. The stream only needs to
    /// speak WebSocket messages; tests drive this with an in-memory pair.
    pub(crate) fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = std::result::Result<Message, WsError>>
            + Sink<Message, Error = WsError>
            + Unpin
            + Send
            + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let correlation = Arc::new(Mutex::new(CorrelationMap::default()));

        tokio::spawn(Self::run_event_loop(
            stream,
            command_rx,
            Arc::clone(&correlation),
        ));

        Self {
            command_tx,
            correlation,
        }
    }

    /// Dials the browser's WebSocket endpoint.
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`] if the URL is not a `ws`/`wss` endpoint
    /// - [`Error::WebSocket`] if the dial fails
    pub async fn connect(url: &str) -> Result<Self> {
        let parsed =
            Url::parse(url).map_err(|e| Error::connection(format!("invalid endpoint {url}: {e}")))?;

        match parsed.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(Error::connection(format!(
                    "unsupported scheme {other}, expected ws or wss"
                )));
            }
        }

        let (stream, _) = connect_async(url).await?;
        debug!(%url, "Connected to browser endpoint");

        Ok(Self::new(stream))
    }

    /// Sends a command and waits for its response with the default timeout.
    ///
    /// Returns the raw, method-specific result payload; interpreting it is
    /// the caller's job.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the connection is closed
    /// - [`Error::CommandFailed`] if the browser returned an error response
    /// - [`Error::CommandTimeout`] if no response arrived in time
    pub async fn send(&self, command: Command) -> Result<Value> {
        self.send_with_timeout(command, DEFAULT_COMMAND_TIMEOUT)
            .await
    }

    /// Sends a command and waits for its response with a caller deadline.
    ///
    /// On timeout the correlation entry is discarded; the event loop drops
    /// the late response instead of leaking a pending-match entry.
    ///
    /// # Errors
    ///
    /// Same as [`Connection::send`], with the timeout taken from the
    /// argument.
    pub async fn send_with_timeout(
        &self,
        command: Command,
        command_timeout: Duration,
    ) -> Result<Value> {
        let envelope = CommandEnvelope::new(command);
        let command_id = envelope.id;

        // Check pending command limit
        {
            let correlation = self.correlation.lock();
            if correlation.len() >= MAX_PENDING_COMMANDS {
                warn!(
                    pending = correlation.len(),
                    max = MAX_PENDING_COMMANDS,
                    "Too many pending commands"
                );
                return Err(Error::connection(format!(
                    "too many pending commands: {}/{}",
                    correlation.len(),
                    MAX_PENDING_COMMANDS
                )));
            }
        }

        // Create response channel
        let (response_tx, response_rx) = oneshot::channel();

        // Send command to event loop
        self.command_tx
            .send(ConnectionCommand::Send {
                envelope,
                response_tx,
            })
            .map_err(|_| Error::ConnectionClosed)?;

        // Wait for response with timeout
        match timeout(command_timeout, response_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => {
                // Timeout - clean up correlation entry
                let _ = self
                    .command_tx
                    .send(ConnectionCommand::RemoveCorrelation(command_id));

                Err(Error::command_timeout(
                    command_id,
                    command_timeout.as_millis() as u64,
                ))
            }
        }
    }

    /// Returns the number of commands awaiting a response.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.correlation.lock().len()
    }

    /// Shuts down the connection gracefully.
    ///
    /// All pending commands fail with [`Error::ConnectionClosed`].
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }

    /// Event loop that owns the socket.
    async fn run_event_loop<S>(
        stream: S,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        correlation: Arc<Mutex<CorrelationMap>>,
    ) where
        S: Stream<Item = std::result::Result<Message, WsError>>
            + Sink<Message, Error = WsError>
            + Unpin
            + Send
            + 'static,
    {
        let (mut ws_write, mut ws_read) = stream.split();

        loop {
            tokio::select! {
                // Incoming messages from the browser
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            Self::handle_incoming_message(&text, &correlation);
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!("WebSocket closed by remote");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                // Commands from the client API
                command = command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send { envelope, response_tx }) => {
                            Self::handle_send_command(
                                envelope,
                                response_tx,
                                &mut ws_write,
                                &correlation,
                            ).await;
                        }

                        Some(ConnectionCommand::RemoveCorrelation(command_id)) => {
                            correlation.lock().remove(&command_id);
                            debug!(%command_id, "Removed timed-out correlation");
                        }

                        Some(ConnectionCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        // Fail all pending commands on shutdown
        Self::fail_pending_commands(&correlation);

        debug!("Event loop terminated");
    }

    /// Handles an incoming text message from the browser.
    fn handle_incoming_message(text: &str, correlation: &Arc<Mutex<CorrelationMap>>) {
        let message = match from_str::<IncomingMessage>(text) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, text = %text, "Failed to parse incoming message");
                return;
            }
        };

        match message {
            IncomingMessage::Success(response) => {
                let tx = correlation.lock().remove(&response.id);

                if let Some(tx) = tx {
                    let _ = tx.send(Ok(response.result));
                } else {
                    // Interest was discarded (timeout); drop, don't leak
                    debug!(id = %response.id, "Dropping response with no waiter");
                }
            }

            IncomingMessage::Error(response) => {
                let Some(id) = response.id else {
                    warn!(
                        error = %response.error,
                        message = %response.message,
                        "Error response without id"
                    );
                    return;
                };

                let tx = correlation.lock().remove(&id);

                if let Some(tx) = tx {
                    let _ = tx.send(Err(Error::command_failed(response.error, response.message)));
                } else {
                    debug!(%id, "Dropping error response with no waiter");
                }
            }

            IncomingMessage::Event(event) => {
                // No subscriptions in this client; observe and move on
                trace!(method = %event.method, "Event received");
            }
        }
    }

    /// Handles a send command from the client API.
    async fn handle_send_command<S>(
        envelope: CommandEnvelope,
        response_tx: oneshot::Sender<Result<Value>>,
        ws_write: &mut SplitSink<S, Message>,
        correlation: &Arc<Mutex<CorrelationMap>>,
    ) where
        S: Sink<Message, Error = WsError> + Unpin,
    {
        let command_id = envelope.id;

        // Serialize envelope
        let json = match to_string(&envelope) {
            Ok(j) => j,
            Err(e) => {
                let _ = response_tx.send(Err(Error::Json(e)));
                return;
            }
        };

        // Store correlation before sending
        correlation.lock().insert(command_id, response_tx);

        // Send over WebSocket
        if let Err(e) = ws_write.send(Message::Text(json.into())).await {
            // Remove correlation and notify caller
            if let Some(tx) = correlation.lock().remove(&command_id) {
                let _ = tx.send(Err(Error::connection(e.to_string())));
            }
            return;
        }

        trace!(%command_id, "Command sent");
    }

    /// Fails all pending commands with a ConnectionClosed error.
    fn fail_pending_commands(correlation: &Arc<Mutex<CorrelationMap>>) {
        let pending: Vec<_> = correlation.lock().drain().collect();
        let count = pending.len();

        for (_, tx) in pending {
            let _ = tx.send(Err(Error::ConnectionClosed));
        }

        if count > 0 {
            debug!(count, "Failed pending commands on shutdown");
        }
    }
}

// ============================================================================
// Test Wire
// ============================================================================

/// In-memory WebSocket stand-in for driving the event loop in tests.
///
/// Shared with the session-level tests, which exercise the full command
/// path without a socket.
#[cfg(test)]
pub(crate) mod testwire {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use futures_util::{Sink, Stream};
    use serde_json::{Value, json};
    use tokio::sync::mpsc;
    use tokio_tungstenite::tungstenite::{Error as WsError, Message};

    use super::Connection;

    /// Fake duplex stream backed by two unbounded channels.
    pub(crate) struct TestWire {
        incoming: mpsc::UnboundedReceiver<Result<Message, WsError>>,
        outgoing: mpsc::UnboundedSender<Message>,
    }

    impl Stream for TestWire {
        type Item = Result<Message, WsError>;

        fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            self.get_mut().incoming.poll_recv(cx)
        }
    }

    impl Sink<Message> for TestWire {
        type Error = WsError;

        fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), WsError>> {
            Poll::Ready(Ok(()))
        }

        fn start_send(self: Pin<&mut Self>, item: Message) -> Result<(), WsError> {
            self.get_mut()
                .outgoing
                .send(item)
                .map_err(|_| WsError::ConnectionClosed)
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), WsError>> {
            Poll::Ready(Ok(()))
        }

        fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), WsError>> {
            Poll::Ready(Ok(()))
        }
    }

    /// Browser-side handle on the fake wire.
    pub(crate) struct WireHarness {
        to_client: mpsc::UnboundedSender<Result<Message, WsError>>,
        from_client: mpsc::UnboundedReceiver<Message>,
    }

    impl WireHarness {
        /// Receives the next outgoing envelope as parsed JSON.
        pub(crate) async fn next_command(&mut self) -> Value {
            let message = self.from_client.recv().await.expect("client closed wire");
            match message {
                Message::Text(text) => serde_json::from_str(&text).expect("envelope is JSON"),
                other => panic!("unexpected message type: {other:?}"),
            }
        }

        /// Returns the next outgoing envelope without waiting, if any.
        pub(crate) fn try_next_command(&mut self) -> Option<Value> {
            match self.from_client.try_recv() {
                Ok(Message::Text(text)) => {
                    Some(serde_json::from_str(&text).expect("envelope is JSON"))
                }
                Ok(other) => panic!("unexpected message type: {other:?}"),
                Err(_) => None,
            }
        }

        /// Injects a success response for the given command id.
        pub(crate) fn respond_success(&self, id: u64, result: Value) {
            self.push(json!({"type": "success", "id": id, "result": result}));
        }

        /// Injects an error response for the given command id.
        pub(crate) fn respond_error(&self, id: u64, error: &str, message: &str) {
            self.push(json!({"type": "error", "id": id, "error": error, "message": message}));
        }

        /// Injects a raw JSON message.
        pub(crate) fn push(&self, value: Value) {
            self.to_client
                .send(Ok(Message::Text(value.to_string().into())))
                .expect("event loop gone");
        }

        /// Closes the browser side, ending the client's read stream.
        pub(crate) fn close(self) {}
    }

    /// Builds a connection wired to an in-memory harness.
    pub(crate) fn connection_pair() -> (Connection, WireHarness) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let (to_client, incoming) = mpsc::unbounded_channel();
        let (outgoing, from_client) = mpsc::unbounded_channel();

        let connection = Connection::new(TestWire { incoming, outgoing });
        let harness = WireHarness {
            to_client,
            from_client,
        };

        (connection, harness)
    }
}

// ============================================================================
// Tests
// ============================================================================

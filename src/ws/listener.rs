//! Native event listener over `tokio-tungstenite`.
//!
//! `EventListener::subscribe` connects and writes the subscription before it
//! returns, so anything submitted on-chain afterwards cannot be missed.
//! `PendingEvent::wait` then settles on the first matching event, a socket
//! error, a close, or a [`CancelHandle::cancel`].

use std::future::Future;
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Notify;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::WsError;
use crate::ws::{AwaitIntent, ListenerConfig, ListenerCore, ListenerEvent, ListenerState, Step};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens one socket per await.
#[derive(Debug, Clone)]
pub struct EventListener {
    config: ListenerConfig,
}

impl EventListener {
    pub fn new(config: ListenerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }

    /// Connect and subscribe to events for `address`.
    pub async fn subscribe(
        &self,
        address: &str,
        intent: AwaitIntent,
    ) -> Result<PendingEvent, WsError> {
        let mut core = ListenerCore::new(address, intent);
        let url = self.config.socket_url();

        let (ws_stream, _) = tokio::time::timeout(self.config.connect_timeout, connect_async(url.as_str()))
            .await
            .map_err(|_| WsError::ConnectionFailed("Connection timeout".into()))?
            .map_err(|e| WsError::ConnectionFailed(e.to_string()))?;

        let (mut sink, stream) = ws_stream.split();

        let request = core.on_open();
        let json = serde_json::to_string(&request)
            .map_err(|e| WsError::SendFailed(e.to_string()))?;
        sink.send(Message::Text(json.into()))
            .await
            .map_err(|e| WsError::SendFailed(e.to_string()))?;
        core.on_subscribed();

        tracing::info!(%address, ?intent, "Subscription request sent");

        Ok(PendingEvent {
            sink,
            stream,
            core,
            cancel: Arc::new(Notify::new()),
            torn_down: false,
        })
    }
}

/// Cancels a pending await from another task.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    notify: Arc<Notify>,
}

impl CancelHandle {
    /// Settle the await with [`WsError::Cancelled`]. A cancel issued before
    /// `wait` starts is remembered.
    pub fn cancel(&self) {
        self.notify.notify_one();
    }
}

/// A subscribed socket waiting for its event.
pub struct PendingEvent {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
    core: ListenerCore,
    cancel: Arc<Notify>,
    torn_down: bool,
}

impl PendingEvent {
    pub fn state(&self) -> ListenerState {
        self.core.state()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            notify: Arc::clone(&self.cancel),
        }
    }

    /// Wait for the first matching event.
    ///
    /// No timeout is applied; wrap in `tokio::time::timeout` for a bounded wait.
    pub async fn wait(&mut self) -> Result<ListenerEvent, WsError> {
        if self.core.state().is_terminal() {
            return Err(WsError::Closed {
                code: None,
                reason: "Listener already settled".into(),
            });
        }

        let cancel = Arc::clone(&self.cancel);

        loop {
            tokio::select! {
                biased;

                _ = cancel.notified() => {
                    self.core.on_closed();
                    tracing::info!("Listener cancelled");
                    self.teardown().await;
                    return Err(WsError::Cancelled);
                }

                msg = self.stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            let text_str: &str = text.as_ref();
                            if let Step::Resolve(event) = self.core.on_text(text_str) {
                                tracing::info!(kind = %event.kind, "Event received");
                                self.teardown().await;
                                return Ok(event);
                            }
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = extract_close(frame.as_ref());
                            self.core.on_closed();
                            // Peer initiated the close; no frame of ours is owed.
                            self.torn_down = true;
                            tracing::warn!(code, %reason, "Socket closed before a matching event");
                            return Err(WsError::Closed { code: Some(code), reason });
                        }
                        Some(Ok(_)) => {} // Ping (pong is queued by tungstenite), Binary, Pong, Frame
                        Some(Err(e)) => {
                            let reason = e.to_string();
                            self.core.on_error();
                            tracing::error!("WebSocket error: {}", reason);
                            self.teardown().await;
                            return Err(WsError::ProtocolError(reason));
                        }
                        None => {
                            self.core.on_closed();
                            self.torn_down = true;
                            return Err(WsError::Closed {
                                code: None,
                                reason: "Stream ended".into(),
                            });
                        }
                    }
                }
            }
        }
    }

    /// Wait while `submit` runs on the same task, then close the socket.
    ///
    /// A failed submission cancels the wait, since its event can never come.
    pub async fn wait_alongside<T, E, F>(
        &mut self,
        submit: F,
    ) -> (Result<ListenerEvent, WsError>, Result<T, E>)
    where
        F: Future<Output = Result<T, E>>,
    {
        let cancel = self.cancel_handle();
        let submit = async move {
            let result = submit.await;
            if result.is_err() {
                cancel.cancel();
            }
            result
        };

        let (event, submitted) = tokio::join!(self.wait(), submit);
        self.close().await;
        (event, submitted)
    }

    /// Close the socket. Safe to call any number of times.
    pub async fn close(&mut self) {
        self.core.on_closed();
        self.teardown().await;
    }

    async fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: "Client disconnect".into(),
        };
        if let Err(e) = self.sink.send(Message::Close(Some(frame))).await {
            tracing::debug!("Close frame not sent: {}", e);
        }
        tracing::debug!(state = ?self.core.state(), "Listener torn down");
    }
}

/// Extract close code and reason from an optional CloseFrame.
fn extract_close(frame: Option<&CloseFrame>) -> (u16, String) {
    match frame {
        Some(f) => (f.code.into(), f.reason.to_string()),
        None => (1006, "No close frame".into()),
    }
}

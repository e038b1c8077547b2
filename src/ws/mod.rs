//! Event subscription layer: wire messages and the listener state machine.
//!
//! The protocol is a single-shot await: open a socket, send one `subscribe`
//! request, settle on the first matching event, close. [`ListenerCore`] holds
//! the transport-free part of that flow; the `ws-native` feature adds the
//! `tokio-tungstenite` transport in [`listener`].

#[cfg(feature = "ws-native")]
pub mod listener;

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[cfg(feature = "ws-native")]
pub use listener::{CancelHandle, EventListener, PendingEvent};

// ─── Event kinds ─────────────────────────────────────────────────────────────

/// Events the platform indexer publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    TokenCreatedEvent,
    UserDepositedEvent,
}

impl EventKind {
    pub const ALL: [EventKind; 2] = [EventKind::TokenCreatedEvent, EventKind::UserDepositedEvent];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::TokenCreatedEvent => "TokenCreatedEvent",
            EventKind::UserDepositedEvent => "UserDepositedEvent",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller is waiting for.
///
/// `TokenCreatedEvent` settles only a deployment await. `UserDepositedEvent`
/// settles either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwaitIntent {
    Deployment,
    Deposit,
}

impl AwaitIntent {
    pub fn matches(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::TokenCreatedEvent => matches!(self, AwaitIntent::Deployment),
            EventKind::UserDepositedEvent => true,
        }
    }
}

// ─── Outbound ────────────────────────────────────────────────────────────────

/// The one JSON-RPC request sent after the socket opens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscribeRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    /// `[event kinds, topics (unused), contract address filter]`
    pub params: (Vec<EventKind>, Vec<String>, Vec<String>),
}

impl SubscribeRequest {
    /// Subscribe to every known event kind, filtered to one address.
    pub fn for_address(address: &str) -> Self {
        Self {
            jsonrpc: "2.0",
            id: 1,
            method: "subscribe",
            params: (EventKind::ALL.to_vec(), Vec::new(), vec![address.to_string()]),
        }
    }
}

// ─── Inbound ─────────────────────────────────────────────────────────────────

/// Raw inbound message: `{ "result": { "event": ..., "data": {...} } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    pub result: EventResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventResult {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// The event that settled a listener.
#[derive(Debug, Clone, PartialEq)]
pub struct ListenerEvent {
    pub kind: EventKind,
    pub data: serde_json::Value,
}

impl ListenerEvent {
    /// Deposit confirmation payload, when this is a `UserDepositedEvent`.
    pub fn deposit(&self) -> Option<DepositEvent> {
        if self.kind != EventKind::UserDepositedEvent {
            return None;
        }
        serde_json::from_value(self.data.clone()).ok()
    }
}

/// Payload of `UserDepositedEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositEvent {
    /// Epoch seconds.
    pub deposit_time: u64,
    pub deposit_tx_hash: String,
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Where and how a listener connects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    pub url: String,
    /// Wallet address sent as the `userSignature` query parameter.
    pub user_signature: String,
    /// Bounds the handshake only, never the wait for an event.
    pub connect_timeout: Duration,
}

impl ListenerConfig {
    pub fn new(url: impl Into<String>, user_signature: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_signature: user_signature.into(),
            connect_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// `<url>?userSignature=<address>`
    pub fn socket_url(&self) -> String {
        let sep = if self.url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}userSignature={}",
            self.url,
            sep,
            urlencoding::encode(&self.user_signature)
        )
    }
}

// ─── State machine ───────────────────────────────────────────────────────────

/// Listener lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Connecting,
    Subscribed,
    Waiting,
    Resolved,
    Rejected,
    /// Closed before a matching event arrived.
    Closed,
}

impl ListenerState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ListenerState::Resolved | ListenerState::Rejected | ListenerState::Closed
        )
    }
}

/// Outcome of feeding one text frame to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Ignore,
    Resolve(ListenerEvent),
}

/// Transport-free listener logic. Settles at most once.
#[derive(Debug, Clone)]
pub struct ListenerCore {
    intent: AwaitIntent,
    address: String,
    state: ListenerState,
}

impl ListenerCore {
    pub fn new(address: impl Into<String>, intent: AwaitIntent) -> Self {
        Self {
            intent,
            address: address.into(),
            state: ListenerState::Connecting,
        }
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    pub fn intent(&self) -> AwaitIntent {
        self.intent
    }

    /// Socket is open: returns the subscription to send.
    pub fn on_open(&mut self) -> SubscribeRequest {
        self.state = ListenerState::Subscribed;
        SubscribeRequest::for_address(&self.address)
    }

    /// Subscription frame written; now waiting for events.
    pub fn on_subscribed(&mut self) {
        if self.state == ListenerState::Subscribed {
            self.state = ListenerState::Waiting;
        }
    }

    /// Feed one inbound text frame.
    pub fn on_text(&mut self, text: &str) -> Step {
        if self.state.is_terminal() {
            return Step::Ignore;
        }

        let envelope = match serde_json::from_str::<EventEnvelope>(text) {
            Ok(env) => env,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unparseable event frame");
                return Step::Ignore;
            }
        };

        match EventKind::from_name(&envelope.result.event) {
            Some(kind) if self.intent.matches(kind) => {
                self.state = ListenerState::Resolved;
                Step::Resolve(ListenerEvent {
                    kind,
                    data: envelope.result.data,
                })
            }
            _ => Step::Ignore,
        }
    }

    /// Socket errored. Returns false if already settled.
    pub fn on_error(&mut self) -> bool {
        self.settle(ListenerState::Rejected)
    }

    /// Socket closed or was cancelled. Returns false if already settled.
    pub fn on_closed(&mut self) -> bool {
        self.settle(ListenerState::Closed)
    }

    fn settle(&mut self, terminal: ListenerState) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = terminal;
        true
    }
}

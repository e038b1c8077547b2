//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    /// A required construction parameter is missing or unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Malformed instruction: {0}")]
    MalformedInstruction(#[from] InstructionError),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Chain submission failed: {0}")]
    ChainSubmission(#[from] ChainError),

    /// The event socket closed or errored before a matching event arrived.
    #[error("Event stream error: {0}")]
    Event(#[from] WsError),

    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type alias for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;

/// Instruction decode errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstructionError {
    #[error("Invalid instruction tag: expected {expected}, got {actual}")]
    InvalidTag { expected: String, actual: String },

    #[error("Invalid data length: expected {expected}, got {actual}")]
    InvalidDataLength { expected: usize, actual: usize },
}

/// Errors raised while building, signing or submitting a transaction.
#[derive(Error, Debug)]
pub enum ChainError {
    #[cfg(feature = "solana-rpc")]
    #[error("Solana RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc { code: i64, message: String },

    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    #[error("Transaction {tx_hash} failed: {reason}")]
    Failed { tx_hash: String, reason: String },

    #[error("Transaction {tx_hash} expired before it landed")]
    Expired { tx_hash: String },

    #[error("Instruction build failed: {0}")]
    Instruction(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),

    #[cfg(feature = "http")]
    #[error("Provider transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server unavailable: {0}")]
    Unavailable(String),
}

/// WebSocket errors.
#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Connection closed: code={code:?} reason={reason}")]
    Closed { code: Option<u16>, reason: String },

    #[error("Listener cancelled")]
    Cancelled,
}

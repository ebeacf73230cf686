//! Error types for the relay engine and the client-side adapter.

use thiserror::Error;

use crate::relay::registry::ConnectionId;

/// Errors produced while driving the relay engine.
///
/// Registry and store level failures are contained here and never crash the
/// relay process: `UnknownConnection` and `DeliveryFailure` are handled
/// internally (no-op and disconnect cleanup respectively), while
/// `MalformedMessage` is surfaced back to the sending client as an `error`
/// event instead of being silently stored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    /// An operation referenced a connection that is not in the registry,
    /// e.g. one that already disconnected.
    #[error("unknown connection {0}")]
    UnknownConnection(ConnectionId),

    /// A send was missing a required field and was rejected before it
    /// reached the store.
    #[error("malformed message: {0} must not be empty")]
    MalformedMessage(&'static str),

    /// A room member's outbound channel is unreachable. Isolated to that
    /// connection; never aborts the broader broadcast.
    #[error("delivery to connection {0} failed")]
    DeliveryFailure(ConnectionId),
}

/// Errors produced by the client-side protocol adapter.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("protocol encode/decode error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The server closed the connection while an event was awaited.
    #[error("connection closed by server")]
    Closed,
}

use tokio::sync::mpsc::UnboundedSender;
use tungstenite::protocol::Message as WsMessage;

use crate::relay::registry::ConnectionId;

/// One connected client, as the relay engine sees it.
///
/// The `sender` feeds the connection's outbound forwarding task; pushing a
/// frame never blocks the engine, so one slow receiver cannot stall a
/// broadcast to the rest of a room.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique for the connection's lifetime, assigned at connect time.
    pub id: ConnectionId,
    pub sender: UnboundedSender<WsMessage>,
}

impl ConnectionHandle {
    pub fn new(sender: UnboundedSender<WsMessage>) -> Self {
        Self {
            id: format!("conn-{}", uuid::Uuid::new_v4()),
            sender,
        }
    }
}

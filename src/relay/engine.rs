use std::collections::HashMap;

use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::connection::ConnectionHandle;
use crate::relay::message::{Message, MessageDraft, TypingEvent};
use crate::relay::registry::{ConnectionId, Registry};
use crate::relay::store::MessageStore;
use crate::transport::message::ServerEvent;
use crate::utils::error::RelayError;

/// The relay engine: the single owner of the connection registry, the
/// message store, and the outbound channel of every live connection.
///
/// One instance is constructed at process start and shared behind
/// `Arc<Mutex<Relay>>`; every mutation runs under that lock, so for a given
/// conversation the order messages are appended is exactly the order they
/// are broadcast, and no reader ever observes a half-appended message.
/// Nothing here is ambient global state, which also means tests can spin up
/// as many independent engines as they like.
#[derive(Debug, Default)]
pub struct Relay {
    registry: Registry,
    store: MessageStore,
    connections: HashMap<ConnectionId, ConnectionHandle>,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose store caps each conversation at the given number of
    /// messages, dropping the oldest beyond it.
    pub fn with_retention(max_messages_per_conversation: Option<usize>) -> Self {
        Self {
            store: MessageStore::with_retention(max_messages_per_conversation),
            ..Self::default()
        }
    }

    /// Registers a freshly accepted connection with empty room membership.
    pub fn register_connection(&mut self, handle: ConnectionHandle) {
        self.registry.register(handle.id.clone());
        self.connections.insert(handle.id.clone(), handle);
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Read-only view of the shared store, for the query facade.
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Joins the connection to the conversation's room and replays the
    /// conversation's full history to that connection alone.
    ///
    /// Unknown conversations succeed vacuously with an empty history; rooms
    /// exist from first use, not by declaration. A join from a connection
    /// that already disconnected yields `UnknownConnection`, which the
    /// transport drops without telling anyone: a join racing a disconnect
    /// must not become a client-visible error.
    pub fn join_conversation(
        &mut self,
        connection_id: &ConnectionId,
        conversation_id: &str,
    ) -> Result<(), RelayError> {
        if !self.registry.is_registered(connection_id) {
            return Err(RelayError::UnknownConnection(connection_id.clone()));
        }
        self.registry.join(connection_id, conversation_id);
        let messages = self.store.history_of(conversation_id);
        debug!(
            %connection_id,
            conversation = conversation_id,
            history_len = messages.len(),
            "joined conversation"
        );
        self.deliver(connection_id, &ServerEvent::ConversationHistory { messages });
        Ok(())
    }

    /// Appends the draft to the store and broadcasts the stored message to
    /// every current room member, the sender's own connection included: the
    /// echo is the sender's only confirmation, keeping the store and every
    /// client's view on a single ordering truth.
    ///
    /// A draft missing its conversation id, sender id, or text is rejected
    /// before anything is stored; the transport reports the error back to
    /// the offending client only.
    pub fn send_message(&mut self, draft: MessageDraft) -> Result<Message, RelayError> {
        if draft.text.is_empty() {
            return Err(RelayError::MalformedMessage("text"));
        }
        let message = self.store.append(draft)?;
        let event = ServerEvent::ReceiveMessage {
            message: message.clone(),
        };
        self.broadcast(&message.conversation_id, &event, None);
        Ok(message)
    }

    /// Relays a typing signal to every other member of the room. Nothing is
    /// stored and nothing orders these relative to messages.
    pub fn relay_typing(&mut self, sender: &ConnectionId, event: TypingEvent) {
        let TypingEvent {
            conversation_id,
            user_id,
            username,
            is_typing,
        } = event;
        let out = ServerEvent::UserTyping {
            user_id,
            username,
            is_typing,
        };
        self.broadcast(&conversation_id, &out, Some(sender));
    }

    /// Sends an `error` event to a single connection.
    pub fn report_error(&mut self, connection_id: &ConnectionId, message: &str) {
        let event = ServerEvent::Error {
            message: message.to_string(),
        };
        self.deliver(connection_id, &event);
    }

    /// Removes the connection and all of its room membership. Other
    /// participants get no explicit signal; the conversation's messages are
    /// untouched.
    pub fn cleanup_connection(&mut self, connection_id: &ConnectionId) {
        self.registry.unregister(connection_id);
        if self.connections.remove(connection_id).is_some() {
            info!(%connection_id, "connection cleaned up");
        }
    }

    /// Serializes `event` and pushes it to one connection, tearing the
    /// connection down if its channel is dead.
    fn deliver(&mut self, connection_id: &ConnectionId, event: &ServerEvent) {
        let Some(frame) = encode(event) else { return };
        let delivered = self
            .connections
            .get(connection_id)
            .is_some_and(|conn| conn.sender.send(frame).is_ok());
        if !delivered {
            warn!(
                %connection_id,
                error = %RelayError::DeliveryFailure(connection_id.clone()),
                "dropping connection"
            );
            self.cleanup_connection(connection_id);
        }
    }

    /// Fans `event` out to the room's current members, minus `exclude`.
    /// Members whose channel is dead are cleaned up after the loop; their
    /// failure never aborts delivery to the rest of the room.
    fn broadcast(&mut self, conversation_id: &str, event: &ServerEvent, exclude: Option<&ConnectionId>) {
        let Some(frame) = encode(event) else { return };
        let mut dead = Vec::new();
        for member in self.registry.members_of(conversation_id) {
            if exclude == Some(&member) {
                continue;
            }
            let sent = self
                .connections
                .get(&member)
                .is_some_and(|conn| conn.sender.send(frame.clone()).is_ok());
            if !sent {
                warn!(
                    connection_id = %member,
                    error = %RelayError::DeliveryFailure(member.clone()),
                    "broadcast delivery failed"
                );
                dead.push(member);
            }
        }
        for member in dead {
            self.cleanup_connection(&member);
        }
    }
}

fn encode(event: &ServerEvent) -> Option<WsMessage> {
    match serde_json::to_string(event) {
        Ok(text) => Some(WsMessage::text(text)),
        Err(e) => {
            warn!("failed to serialize server event: {e}");
            None
        }
    }
}

use serde::{Deserialize, Serialize};

/// A chat message as stored in the message store and delivered to clients.
///
/// Messages are immutable once created: the relay never mutates or deletes
/// them (read-state changes happen outside the relay). The `id` is assigned
/// by the store and is unique for the process lifetime even when two sends
/// land in the same millisecond. Field names serialize camelCase to match
/// the wire format the frontend expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub receiver_id: String,
    pub text: String,
    /// Creation instant, Unix milliseconds.
    pub timestamp: i64,
    pub is_read: bool,
}

/// A message as submitted by a client, before the store assigns an id and,
/// when the client supplied none, a server timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    pub conversation_id: String,
    pub text: String,
    pub sender_id: String,
    pub sender_name: String,
    pub receiver_id: String,
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub is_read: bool,
}

/// An ephemeral typing signal. Relayed to other room members and never
/// retained server-side; timeout-based clearing is the receiving client's
/// concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingEvent {
    pub conversation_id: String,
    pub user_id: String,
    pub username: String,
    pub is_typing: bool,
}

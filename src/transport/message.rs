use serde::{Deserialize, Serialize};

use crate::relay::message::Message;

/// Events a client sends to the relay. Tagged JSON, camelCase fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "join_conversation", rename_all = "camelCase")]
    JoinConversation { conversation_id: String },

    #[serde(rename = "send_message", rename_all = "camelCase")]
    SendMessage {
        conversation_id: String,
        text: String,
        sender_id: String,
        sender_name: String,
        receiver_id: String,
        timestamp: Option<i64>,
        #[serde(default)]
        is_read: bool,
    },

    #[serde(rename = "typing", rename_all = "camelCase")]
    Typing {
        conversation_id: String,
        user_id: String,
        username: String,
        is_typing: bool,
    },
}

/// Events the relay sends to clients.
///
/// `conversation_history` goes only to a joining connection;
/// `receive_message` is the room broadcast (the sender's echo included);
/// `user_typing` goes to the room minus the typist; `error` goes only to
/// the client whose input was rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "conversation_history")]
    ConversationHistory { messages: Vec<Message> },

    #[serde(rename = "receive_message")]
    ReceiveMessage { message: Message },

    #[serde(rename = "user_typing", rename_all = "camelCase")]
    UserTyping {
        user_id: String,
        username: String,
        is_typing: bool,
    },

    #[serde(rename = "error")]
    Error { message: String },
}

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::relay::Relay;
use crate::relay::message::Message;

/// The conversation partner as seen from one user's conversation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    pub id: String,
    pub name: String,
}

/// Preview of the newest message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub text: String,
    pub timestamp: i64,
    pub is_read: bool,
    pub sent_by_me: bool,
}

/// One row of a user's conversation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: String,
    pub user: Peer,
    pub last_message: LastMessage,
}

/// Stateless read-only accessors over the relay's store.
///
/// Each call takes the engine lock briefly and returns owned data, so a
/// bootstrap read can never observe a half-appended message and never
/// blocks the relay for longer than one snapshot.
pub struct QueryFacade {
    relay: Arc<Mutex<Relay>>,
}

impl QueryFacade {
    pub fn new(relay: Arc<Mutex<Relay>>) -> Self {
        Self { relay }
    }

    /// Every conversation in which `user_id` has sent or received at least
    /// one message, summarized by its newest message and sorted newest
    /// first.
    pub fn list_conversations(&self, user_id: &str) -> Vec<ConversationSummary> {
        let relay = self.relay.lock().unwrap();
        let store = relay.store();

        let mut summaries: Vec<ConversationSummary> = store
            .conversations_involving(user_id)
            .into_iter()
            .filter_map(|conversation_id| {
                let last = store.last_message_of(&conversation_id)?;
                let sent_by_me = last.sender_id == user_id;
                let peer = if sent_by_me {
                    // The store only knows display names of senders, so a
                    // conversation whose newest message is our own gets a
                    // placeholder name. A user directory would resolve it.
                    Peer {
                        id: last.receiver_id.clone(),
                        name: format!("User {}", last.receiver_id),
                    }
                } else {
                    Peer {
                        id: last.sender_id.clone(),
                        name: last.sender_name.clone(),
                    }
                };
                Some(ConversationSummary {
                    id: conversation_id,
                    user: peer,
                    last_message: LastMessage {
                        text: last.text.clone(),
                        timestamp: last.timestamp,
                        is_read: last.is_read,
                        sent_by_me,
                    },
                })
            })
            .collect();

        summaries.sort_by(|a, b| b.last_message.timestamp.cmp(&a.last_message.timestamp));
        summaries
    }

    /// All messages of a conversation in send order; identical to the
    /// history a joining connection receives.
    pub fn list_messages(&self, conversation_id: &str) -> Vec<Message> {
        self.relay.lock().unwrap().store().history_of(conversation_id)
    }
}

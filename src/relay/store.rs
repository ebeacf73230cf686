use std::collections::{HashMap, HashSet, VecDeque};

use chrono::Utc;

use crate::relay::message::{Message, MessageDraft};
use crate::utils::error::RelayError;

/// Append-only in-memory log of all messages, indexed by conversation.
///
/// Conversations are not declared in advance: appending the first message
/// for a conversation id creates its sequence. Messages are kept for the
/// process lifetime; there is no persistence across restarts. Growth is
/// unbounded by default, with an optional per-conversation retention cap
/// that drops the oldest messages once exceeded.
#[derive(Debug, Default)]
pub struct MessageStore {
    conversations: HashMap<String, VecDeque<Message>>,
    max_messages_per_conversation: Option<usize>,
    next_seq: u64,
}

impl MessageStore {
    /// An unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(max_messages_per_conversation: Option<usize>) -> Self {
        Self {
            max_messages_per_conversation,
            ..Self::default()
        }
    }

    /// Assigns a unique id (and a server timestamp when the draft carries
    /// none) and appends to the conversation's ordered sequence.
    ///
    /// Rejects drafts with an empty conversation or sender id; anything
    /// well-formed is accepted. The id embeds a process-wide counter so two
    /// appends in the same millisecond never collide.
    pub fn append(&mut self, draft: MessageDraft) -> Result<Message, RelayError> {
        if draft.conversation_id.is_empty() {
            return Err(RelayError::MalformedMessage("conversationId"));
        }
        if draft.sender_id.is_empty() {
            return Err(RelayError::MalformedMessage("senderId"));
        }

        let timestamp = draft
            .timestamp
            .unwrap_or_else(|| Utc::now().timestamp_millis());
        self.next_seq += 1;
        let message = Message {
            id: format!("{timestamp}-{}", self.next_seq),
            conversation_id: draft.conversation_id,
            sender_id: draft.sender_id,
            sender_name: draft.sender_name,
            receiver_id: draft.receiver_id,
            text: draft.text,
            timestamp,
            is_read: draft.is_read,
        };

        let log = self
            .conversations
            .entry(message.conversation_id.clone())
            .or_default();
        log.push_back(message.clone());
        if let Some(cap) = self.max_messages_per_conversation {
            while log.len() > cap {
                log.pop_front();
            }
        }

        Ok(message)
    }

    /// All messages of a conversation in send order, as a point-in-time
    /// snapshot. Empty for a conversation nobody has written to.
    pub fn history_of(&self, conversation_id: &str) -> Vec<Message> {
        self.conversations
            .get(conversation_id)
            .map(|log| log.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn last_message_of(&self, conversation_id: &str) -> Option<&Message> {
        self.conversations
            .get(conversation_id)
            .and_then(|log| log.back())
    }

    /// Every conversation containing at least one message where the user is
    /// sender or receiver.
    pub fn conversations_involving(&self, user_id: &str) -> HashSet<String> {
        self.conversations
            .iter()
            .filter(|(_, log)| {
                log.iter()
                    .any(|msg| msg.sender_id == user_id || msg.receiver_id == user_id)
            })
            .map(|(conversation_id, _)| conversation_id.clone())
            .collect()
    }

    pub fn message_count(&self) -> usize {
        self.conversations.values().map(VecDeque::len).sum()
    }
}

use std::collections::{HashMap, HashSet};

pub type ConnectionId = String;

/// A room: the set of connections currently joined to one conversation.
///
/// Rooms are the fan-out target for broadcasts. They are created implicitly
/// by the first join and pruned once their last member disconnects; the
/// conversation's messages live in the store regardless.
#[derive(Debug, Default)]
pub struct Room {
    pub conversation_id: String,
    pub members: HashSet<ConnectionId>,
}

impl Room {
    pub fn new(conversation_id: &str) -> Self {
        Self {
            conversation_id: conversation_id.to_string(),
            members: HashSet::new(),
        }
    }

    /// Adds a member. Joining twice has no additional effect.
    pub fn join(&mut self, id: ConnectionId) {
        self.members.insert(id);
    }

    pub fn remove(&mut self, id: &ConnectionId) {
        self.members.remove(id);
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The connection registry: every live connection and the rooms it has
/// joined. Membership is additive; there is no leave operation short of
/// disconnecting.
#[derive(Debug, Default)]
pub struct Registry {
    rooms: HashMap<String, Room>,
    connections: HashMap<ConnectionId, HashSet<String>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a connection record with empty membership.
    pub fn register(&mut self, id: ConnectionId) {
        self.connections.entry(id).or_default();
    }

    pub fn is_registered(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    /// Adds the connection to the conversation's room, creating the room on
    /// first use. A join for an unknown connection is a silent no-op so that
    /// a join racing a disconnect never turns into a client-visible error.
    pub fn join(&mut self, id: &ConnectionId, conversation_id: &str) {
        let Some(joined) = self.connections.get_mut(id) else {
            return;
        };
        joined.insert(conversation_id.to_string());
        self.rooms
            .entry(conversation_id.to_string())
            .or_insert_with(|| Room::new(conversation_id))
            .join(id.clone());
    }

    /// Removes the connection and its membership in every room it joined.
    /// Empty rooms are dropped.
    pub fn unregister(&mut self, id: &ConnectionId) {
        let Some(joined) = self.connections.remove(id) else {
            return;
        };
        for conversation_id in joined {
            if let Some(room) = self.rooms.get_mut(&conversation_id) {
                room.remove(id);
                if room.is_empty() {
                    self.rooms.remove(&conversation_id);
                }
            }
        }
    }

    /// Current members of a conversation's room, cloned so fan-out can run
    /// without holding a borrow of the registry.
    pub fn members_of(&self, conversation_id: &str) -> HashSet<ConnectionId> {
        self.rooms
            .get(conversation_id)
            .map(|room| room.members.clone())
            .unwrap_or_default()
    }

    /// The conversations a connection has joined.
    pub fn rooms_of(&self, id: &ConnectionId) -> HashSet<String> {
        self.connections.get(id).cloned().unwrap_or_default()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use shared::{RoomID, protocol::Role};
use tokio::sync::RwLock;

use crate::connection::ConnectionID;

/// Protocol bookkeeping for a connection that completed a JOIN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTags {
    pub role: Role,
    pub room_id: RoomID,
}

/// Maps connection identity to its role and bound room, kept apart from the
/// transport so dispatch and disconnect handling can answer "who am I and
/// which room" without touching the socket.
pub struct ConnectionRegistry {
    next_id: AtomicU64,
    tags: RwLock<HashMap<ConnectionID, ConnectionTags>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            tags: RwLock::new(HashMap::new()),
        }
    }

    pub fn allocate_id(&self) -> ConnectionID {
        ConnectionID::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Tags are write-once: returns false and leaves the existing tags alone
    /// if this connection is already bound.
    pub async fn bind(&self, id: ConnectionID, role: Role, room_id: RoomID) -> bool {
        let mut tags = self.tags.write().await;

        if tags.contains_key(&id) {
            return false;
        }

        tags.insert(id, ConnectionTags { role, room_id });

        true
    }

    pub async fn tags(&self, id: ConnectionID) -> Option<ConnectionTags> {
        self.tags.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: ConnectionID) -> Option<ConnectionTags> {
        self.tags.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.tags.read().await.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

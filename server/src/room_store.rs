use std::{collections::HashMap, sync::Arc};

use log::info;
use shared::RoomID;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::{connection::ConnectionID, room::Room};

pub type RoomGuard = OwnedMutexGuard<Room>;

/// Process-wide room table.
///
/// The map lock is held only long enough to find or insert an entry; every
/// mutation happens under the room's own mutex, so rooms never contend with
/// each other. A room that has been torn down is marked closed under its
/// mutex before it leaves the map, and anyone who raced for it retries
/// against the map.
pub struct RoomStore {
    rooms: RwLock<HashMap<RoomID, Arc<Mutex<Room>>>>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Locks the room, creating it first if it does not exist.
    pub async fn lock_or_create(&self, room_id: &str) -> RoomGuard {
        loop {
            let room = self.get_or_insert(room_id).await;
            let guard = room.lock_owned().await;

            if !guard.is_closed() {
                return guard;
            }
        }
    }

    /// Locks the room only if it currently exists.
    pub async fn lock_existing(&self, room_id: &str) -> Option<RoomGuard> {
        let room = self.rooms.read().await.get(room_id).cloned()?;
        let guard = room.lock_owned().await;

        if guard.is_closed() {
            return None;
        }

        Some(guard)
    }

    /// Removes the room if `organizer_id` is its organizer. The returned
    /// guard keeps the closed room locked so the caller can notify its
    /// viewers before anyone can observe the replacement room.
    pub async fn teardown(&self, room_id: &str, organizer_id: ConnectionID) -> Option<RoomGuard> {
        let room = self.rooms.read().await.get(room_id).cloned()?;
        let mut guard = room.clone().lock_owned().await;

        if guard.is_closed() || guard.organizer() != Some(organizer_id) {
            return None;
        }

        guard.close();

        let mut rooms = self.rooms.write().await;
        if rooms
            .get(room_id)
            .is_some_and(|current| Arc::ptr_eq(current, &room))
        {
            rooms.remove(room_id);
        }

        Some(guard)
    }

    pub async fn contains(&self, room_id: &str) -> bool {
        self.rooms.read().await.contains_key(room_id)
    }

    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    async fn get_or_insert(&self, room_id: &str) -> Arc<Mutex<Room>> {
        if let Some(room) = self.rooms.read().await.get(room_id) {
            return room.clone();
        }

        self.rooms
            .write()
            .await
            .entry(room_id.to_string())
            .or_insert_with(|| {
                info!("Room '{}' created", room_id);
                Arc::new(Mutex::new(Room::new(room_id)))
            })
            .clone()
    }
}

impl Default for RoomStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::protocol::{Role, ServerMessage};
    use tokio::sync::mpsc;

    use crate::connection::ConnectionHandle;

    fn handle(id: u64) -> ConnectionHandle {
        let (tx, _rx) = mpsc::unbounded_channel::<ServerMessage>();
        ConnectionHandle::new(ConnectionID::new(id), tx)
    }

    #[tokio::test]
    async fn creates_room_on_demand() {
        let store = RoomStore::new();
        assert!(!store.contains("demo").await);

        let room = store.lock_or_create("demo").await;
        assert_eq!(room.name(), "demo");
        drop(room);

        assert!(store.contains("demo").await);
        assert!(store.lock_existing("demo").await.is_some());
        assert!(store.lock_existing("other").await.is_none());
    }

    #[tokio::test]
    async fn teardown_removes_room_and_forgets_state() {
        let store = RoomStore::new();
        {
            let mut room = store.lock_or_create("demo").await;
            room.admit(handle(1));
            room.admit(handle(2));
            room.set_config(serde_json::json!({"titulo": "X"}));
        }

        let closed = store.teardown("demo", ConnectionID::new(1)).await.unwrap();
        assert!(closed.is_closed());
        assert_eq!(closed.viewers(), vec![ConnectionID::new(2)]);
        drop(closed);

        assert!(!store.contains("demo").await);

        let fresh = store.lock_or_create("demo").await;
        assert_eq!(fresh.organizer(), None);
        assert!(fresh.viewers().is_empty());
        assert_eq!(fresh.config(), &serde_json::json!({}));
    }

    #[tokio::test]
    async fn teardown_requires_the_bound_organizer() {
        let store = RoomStore::new();
        {
            let mut room = store.lock_or_create("demo").await;
            room.admit(handle(1));
            room.admit(handle(2));
        }

        assert!(store.teardown("demo", ConnectionID::new(2)).await.is_none());
        assert!(store.teardown("missing", ConnectionID::new(1)).await.is_none());
        assert!(store.contains("demo").await);
    }

    #[tokio::test]
    async fn concurrent_joins_elect_one_organizer() {
        let store = Arc::new(RoomStore::new());
        let mut tasks = Vec::new();

        for id in 0..32 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.lock_or_create("race").await.admit(handle(id))
            }));
        }

        let mut organizers = 0;
        for task in tasks {
            if task.await.unwrap() == Role::Organizer {
                organizers += 1;
            }
        }

        assert_eq!(organizers, 1);
        assert_eq!(store.lock_existing("race").await.unwrap().viewers().len(), 31);
    }

    #[tokio::test]
    async fn rooms_are_independent() {
        let store = RoomStore::new();

        let a = store.lock_or_create("a").await;
        let b = store.lock_or_create("b").await;

        assert_eq!(a.name(), "a");
        assert_eq!(b.name(), "b");
        assert_eq!(store.len().await, 2);
    }
}

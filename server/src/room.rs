use serde_json::{Value, json};
use shared::protocol::{Role, ServerMessage};

use crate::connection::{ConnectionHandle, ConnectionID};

pub struct Room {
    name: String,
    organizer: Option<ConnectionHandle>,
    viewers: Vec<ConnectionHandle>,
    config: Value,
    closed: bool,
}

impl Room {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            organizer: None,
            viewers: Vec::new(),
            config: json!({}),
            closed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First come, first served: the first connection admitted to a room
    /// without an organizer takes the role, everyone after is a viewer.
    pub fn admit(&mut self, connection: ConnectionHandle) -> Role {
        if self.organizer.is_none() {
            self.organizer = Some(connection);
            return Role::Organizer;
        }

        if !self.viewers.contains(&connection) {
            self.viewers.push(connection);
        }

        Role::Viewer
    }

    pub fn organizer(&self) -> Option<ConnectionID> {
        self.organizer.as_ref().map(ConnectionHandle::id)
    }

    pub fn viewers(&self) -> Vec<ConnectionID> {
        self.viewers.iter().map(ConnectionHandle::id).collect()
    }

    pub fn config(&self) -> &Value {
        &self.config
    }

    pub fn set_config(&mut self, config: Value) {
        self.config = config;
    }

    pub fn remove_viewer(&mut self, id: ConnectionID) -> bool {
        let before = self.viewers.len();
        self.viewers.retain(|viewer| viewer.id() != id);
        self.viewers.len() != before
    }

    /// Enqueues `message` for every open viewer and returns how many were
    /// reached. Viewers whose connection is no longer open are skipped but
    /// stay in the list until their own disconnect removes them.
    pub fn broadcast(&self, message: &ServerMessage) -> usize {
        let mut delivered = 0;

        for viewer in &self.viewers {
            if viewer.is_open() && viewer.send(message.clone()) {
                delivered += 1;
            }
        }

        delivered
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
    }
}

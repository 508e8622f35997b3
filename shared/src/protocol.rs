//! JSON envelopes exchanged between clients and the relay.
//!
//! Inbound:  `{"type": "SYNC_CONFIG", "id_sorteio": "demo", "payload": {...}}`
//! Outbound: `{"type": "CONFIG_UPDATE", "payload": {...}}`
//!
//! Payloads are carried as raw JSON values; the relay never looks inside them.

use core::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::Display;

use crate::RoomID;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Role {
    #[serde(rename = "configurador")]
    #[strum(serialize = "configurador")]
    Organizer,
    #[serde(rename = "espectador")]
    #[strum(serialize = "espectador")]
    Viewer,
}

/// Client to relay envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    #[serde(rename = "JOIN_SORTEIO")]
    Join { id_sorteio: RoomID },
    SyncConfig {
        id_sorteio: RoomID,
        #[serde(default)]
        payload: Value,
    },
    SendMessage {
        id_sorteio: RoomID,
        #[serde(default)]
        payload: Value,
    },
    StartDraw {
        id_sorteio: RoomID,
        #[serde(default)]
        payload: Value,
    },
}

impl ClientMessage {
    pub fn room_id(&self) -> &str {
        match self {
            ClientMessage::Join { id_sorteio }
            | ClientMessage::SyncConfig { id_sorteio, .. }
            | ClientMessage::SendMessage { id_sorteio, .. }
            | ClientMessage::StartDraw { id_sorteio, .. } => id_sorteio,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Join { .. } => "JOIN_SORTEIO",
            ClientMessage::SyncConfig { .. } => "SYNC_CONFIG",
            ClientMessage::SendMessage { .. } => "SEND_MESSAGE",
            ClientMessage::StartDraw { .. } => "START_DRAW",
        }
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Serialization(e.to_string()))
    }

    /// Unknown `type` values fail here just like malformed JSON does.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(|e| ProtocolError::Deserialization(e.to_string()))
    }
}

/// Relay to client envelope. Only the relay ever produces these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    RoleAssigned { role: Role },
    ConfigUpdate(Value),
    MessageReceive(Value),
    DrawResult(Value),
    ConfiguratorLeft,
}

impl ServerMessage {
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Serialization(e.to_string()))
    }

    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(|e| ProtocolError::Deserialization(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolError {
    Serialization(String),
    Deserialization(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Serialization(e) => write!(f, "failed to encode envelope: {}", e),
            ProtocolError::Deserialization(e) => write!(f, "failed to decode envelope: {}", e),
        }
    }
}

impl Error for ProtocolError {}

use log::{debug, info, warn};
use serde_json::Value;
use shared::{
    RoomID,
    protocol::{ClientMessage, Role, ServerMessage},
};

use crate::{connection::ConnectionHandle, relay::RelayState};

pub struct CommandHandler;

impl CommandHandler {
    /// Decodes and dispatches one inbound text frame. Frames that fail to
    /// decode are dropped; the connection stays open.
    pub async fn handle_frame(text: &str, connection: &ConnectionHandle, state: &RelayState) {
        match ClientMessage::decode(text) {
            Ok(command) => Self::handle_command(command, connection, state).await,
            Err(e) => warn!("Discarding frame from connection {}: {}", connection.id(), e),
        }
    }

    pub async fn handle_command(
        incoming_command: ClientMessage,
        connection: &ConnectionHandle,
        state: &RelayState,
    ) {
        debug!(
            "{} for room '{}' from connection {}",
            incoming_command.kind(),
            incoming_command.room_id(),
            connection.id()
        );

        match incoming_command {
            ClientMessage::Join { id_sorteio } => Self::join(id_sorteio, connection, state).await,
            ClientMessage::SyncConfig {
                id_sorteio,
                payload,
            } => Self::sync_config(id_sorteio, payload, connection, state).await,
            ClientMessage::SendMessage {
                id_sorteio,
                payload,
            } => {
                let room = state.store.lock_or_create(&id_sorteio).await;
                let delivered = room.broadcast(&ServerMessage::MessageReceive(payload));
                info!("Message sent to room '{}' ({} viewers)", id_sorteio, delivered);
            }
            ClientMessage::StartDraw {
                id_sorteio,
                payload,
            } => {
                if !Self::is_authorized(&id_sorteio, connection, state).await {
                    return;
                }

                let room = state.store.lock_or_create(&id_sorteio).await;
                let delivered = room.broadcast(&ServerMessage::DrawResult(payload));
                info!("Draw started in room '{}' ({} viewers)", id_sorteio, delivered);
            }
        }
    }

    async fn join(room_id: RoomID, connection: &ConnectionHandle, state: &RelayState) {
        if let Some(tags) = state.registry.tags(connection.id()).await {
            warn!(
                "Connection {} is already {} of room '{}', ignoring JOIN for '{}'",
                connection.id(),
                tags.role,
                tags.room_id,
                room_id
            );
            return;
        }

        let mut room = state.store.lock_or_create(&room_id).await;
        let role = room.admit(connection.clone());

        state
            .registry
            .bind(connection.id(), role, room_id.clone())
            .await;

        connection.send(ServerMessage::RoleAssigned { role });

        if role == Role::Viewer {
            connection.send(ServerMessage::ConfigUpdate(room.config().clone()));
        }

        info!(
            "Connection {} became {} of room '{}'",
            connection.id(),
            role,
            room_id
        );
    }

    async fn sync_config(
        room_id: RoomID,
        payload: Value,
        connection: &ConnectionHandle,
        state: &RelayState,
    ) {
        if !Self::is_authorized(&room_id, connection, state).await {
            return;
        }

        let mut room = state.store.lock_or_create(&room_id).await;
        room.set_config(payload.clone());
        let delivered = room.broadcast(&ServerMessage::ConfigUpdate(payload));

        info!(
            "Configuration synced for room '{}' ({} viewers)",
            room_id, delivered
        );
    }

    async fn is_authorized(room_id: &str, connection: &ConnectionHandle, state: &RelayState) -> bool {
        if !state.config.enforce_organizer_authority {
            return true;
        }

        let authorized = state
            .registry
            .tags(connection.id())
            .await
            .is_some_and(|tags| tags.role == Role::Organizer && tags.room_id == room_id);

        if !authorized {
            warn!(
                "Connection {} is not the organizer of room '{}', dropping request",
                connection.id(),
                room_id
            );
        }

        authorized
    }
}

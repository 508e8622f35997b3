use log::{debug, info};
use shared::protocol::{Role, ServerMessage};

use crate::{connection::ConnectionID, relay::RelayState};

pub struct Lifecycle;

impl Lifecycle {
    /// Runs once per connection after its transport has closed.
    ///
    /// An organizer takes its room down with it and every viewer is told
    /// `CONFIGURATOR_LEFT`. A viewer just leaves the viewer list. Connections
    /// that never joined, or whose room is already gone, change nothing.
    pub async fn handle_disconnect(connection_id: ConnectionID, state: &RelayState) {
        let tags = match state.registry.remove(connection_id).await {
            Some(tags) => tags,
            None => {
                debug!("Connection {} closed without joining a room", connection_id);
                return;
            }
        };

        match tags.role {
            Role::Organizer => {
                let Some(room) = state.store.teardown(&tags.room_id, connection_id).await else {
                    return;
                };

                let notified = room.broadcast(&ServerMessage::ConfiguratorLeft);

                info!(
                    "Organizer of room '{}' disconnected, room closed ({} viewers notified)",
                    room.name(),
                    notified
                );
            }
            Role::Viewer => {
                let Some(mut room) = state.store.lock_existing(&tags.room_id).await else {
                    debug!(
                        "Viewer {} left room '{}' after it closed",
                        connection_id, tags.room_id
                    );
                    return;
                };

                if room.remove_viewer(connection_id) {
                    info!("Viewer {} left room '{}'", connection_id, tags.room_id);
                }
            }
        }
    }
}

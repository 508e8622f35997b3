use core::error::Error;
use std::{net::SocketAddr, sync::Arc, time::Duration};

use log::{error, info};
use shared::DEFAULT_PORT;
use tokio::net::TcpListener;

use crate::{connection_registry::ConnectionRegistry, room_store::RoomStore, ws_handler::WsHandler};

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: String,
    /// Only the bound organizer of a room may sync its config or start a draw.
    pub enforce_organizer_authority: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{}", DEFAULT_PORT),
            enforce_organizer_authority: false,
        }
    }
}

/// Everything a connection task needs, shared across all of them.
pub struct RelayState {
    pub store: RoomStore,
    pub registry: ConnectionRegistry,
    pub config: RelayConfig,
}

impl RelayState {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            store: RoomStore::new(),
            registry: ConnectionRegistry::new(),
            config,
        }
    }
}

pub struct Relay {
    listener: TcpListener,
    state: Arc<RelayState>,
}

impl Relay {
    pub async fn bind(config: RelayConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(Self {
            listener: TcpListener::bind(&config.bind_addr).await?,
            state: Arc::new(RelayState::new(config)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Box<dyn Error + Send + Sync>> {
        Ok(self.listener.local_addr()?)
    }

    pub fn state(&self) -> Arc<RelayState> {
        self.state.clone()
    }

    pub async fn listen(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        info!(
            "Relay accepting connections (organizer authority {})",
            if self.state.config.enforce_organizer_authority {
                "enforced"
            } else {
                "not enforced"
            }
        );

        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    continue;
                }
            };

            let state = self.state.clone();

            tokio::spawn(async move {
                if let Err(e) = WsHandler::handle_stream(stream, addr, state).await {
                    error!("Error handling connection from {}: {}", addr, e);
                }
            });
        }
    }
}

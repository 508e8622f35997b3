use core::error::Error;
use std::{net::SocketAddr, sync::Arc};

use futures_util::{SinkExt, StreamExt};
use log::{info, warn};
use shared::protocol::ServerMessage;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{WebSocketStream, accept_async, tungstenite::Message};

use crate::{
    command_handler::CommandHandler, connection::ConnectionHandle, lifecycle::Lifecycle,
    relay::RelayState,
};

pub struct WsHandler;

impl WsHandler {
    pub async fn handle_stream(
        stream: TcpStream,
        addr: SocketAddr,
        state: Arc<RelayState>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let ws_stream = accept_async(stream).await?;

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let connection = ConnectionHandle::new(state.registry.allocate_id(), outbound_tx);

        info!("Connection {} opened from {}", connection.id(), addr);

        let result = Self::run(ws_stream, outbound_rx, &connection, &state).await;

        Lifecycle::handle_disconnect(connection.id(), &state).await;
        info!("Connection {} closed", connection.id());

        result
    }

    async fn run(
        ws_stream: WebSocketStream<TcpStream>,
        mut outbound_rx: mpsc::UnboundedReceiver<ServerMessage>,
        connection: &ConnectionHandle,
        state: &RelayState,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        loop {
            tokio::select! {

                result = ws_receiver.next() => {

                    let frame = match result {
                        None => return Ok(()),
                        Some(frame) => frame?,
                    };

                    match frame {
                        Message::Text(text) => {
                            CommandHandler::handle_frame(text.as_str(), connection, state).await;
                        }
                        Message::Binary(data) => match std::str::from_utf8(&data) {
                            Ok(text) => CommandHandler::handle_frame(text, connection, state).await,
                            Err(_) => warn!("Discarding non UTF-8 frame from connection {}", connection.id()),
                        },
                        Message::Close(_) => {
                            // flushes the close reply tungstenite queued on read
                            let _ = ws_sender.close().await;
                            return Ok(());
                        }
                        _ => {}
                    }
                }

                result = outbound_rx.recv() => {

                    let outgoing_message = match result {
                        Some(message) => message,
                        None => return Ok(()),
                    };

                    ws_sender.send(Message::text(outgoing_message.encode()?)).await?;
                }
            }
        }
    }
}

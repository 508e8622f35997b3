use core::error::Error;

use futures::{SinkExt, StreamExt};
use shared::protocol::{ClientMessage, Role, ServerMessage};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::{
    cli_display::CliDisplay, organizer_interface::OrganizerInterface,
    viewer_interface::ViewerInterface,
};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct Client {}

impl Client {
    pub async fn run(
        server_addr: &str,
        port: u16,
        room_id: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let server_url = format!("ws://{}:{}", server_addr, port);

        let (mut ws_stream, _) = connect_async(server_url.as_str()).await?;

        let role = perform_join(&mut ws_stream, room_id).await?;
        CliDisplay::print_connected_message(&server_url, room_id, role);

        match role {
            Role::Organizer => OrganizerInterface::run(ws_stream, room_id).await,
            Role::Viewer => ViewerInterface::run(ws_stream).await,
        }
    }
}

pub async fn perform_join(
    ws_stream: &mut WsStream,
    room_id: &str,
) -> Result<Role, Box<dyn Error + Send + Sync>> {
    send_command(
        ws_stream,
        &ClientMessage::Join {
            id_sorteio: room_id.to_string(),
        },
    )
    .await?;

    match read_server_message(ws_stream).await? {
        Some(ServerMessage::RoleAssigned { role }) => Ok(role),
        Some(_) => Err("Invalid message from server during join".into()),
        None => Err("Unexpected EOF from server during join".into()),
    }
}

pub async fn send_command(
    ws_stream: &mut WsStream,
    command: &ClientMessage,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    ws_stream.send(Message::text(command.encode()?)).await?;

    Ok(())
}

/// Next relay envelope, or `None` once the connection is closed.
pub async fn read_server_message(
    ws_stream: &mut WsStream,
) -> Result<Option<ServerMessage>, Box<dyn Error + Send + Sync>> {
    loop {
        let frame = match ws_stream.next().await {
            None => return Ok(None),
            Some(frame) => frame?,
        };

        match frame {
            Message::Text(text) => return Ok(Some(ServerMessage::decode(text.as_str())?)),
            Message::Close(_) => return Ok(None),
            _ => continue,
        }
    }
}

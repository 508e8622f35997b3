use core::error::Error;
use std::time::Duration;

use shared::{
    payload::{ChatMessage, DrawOutcome, WheelConfig, from_payload},
    protocol::ServerMessage,
};
use tokio::task::JoinHandle;

use crate::{
    cli_display::CliDisplay,
    client::{WsStream, read_server_message},
};

pub struct ViewerInterface;

impl ViewerInterface {
    pub async fn run(mut ws_stream: WsStream) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut reveals = PendingReveals::new();

        let result = Self::receive_loop(&mut ws_stream, &mut reveals).await;

        reveals.finish().await;

        result
    }

    async fn receive_loop(
        ws_stream: &mut WsStream,
        reveals: &mut PendingReveals,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        loop {
            let message = match read_server_message(ws_stream).await? {
                Some(message) => message,
                None => {
                    CliDisplay::print_connection_lost();
                    return Ok(());
                }
            };

            match message {
                ServerMessage::ConfigUpdate(payload) => {
                    match from_payload::<WheelConfig>(&payload) {
                        Ok(config) => CliDisplay::print_config(&config),
                        Err(e) => eprintln!("Ignoring unreadable configuration: {}", e),
                    }
                }
                ServerMessage::MessageReceive(payload) => {
                    match from_payload::<ChatMessage>(&payload) {
                        Ok(chat) => CliDisplay::print_chat_message(&chat.texto),
                        Err(e) => eprintln!("Ignoring unreadable message: {}", e),
                    }
                }
                ServerMessage::DrawResult(payload) => match from_payload::<DrawOutcome>(&payload) {
                    Ok(outcome) => reveals.schedule(outcome),
                    Err(e) => eprintln!("Ignoring unreadable draw result: {}", e),
                },
                ServerMessage::ConfiguratorLeft => {
                    CliDisplay::print_configurator_left();
                    return Ok(());
                }
                ServerMessage::RoleAssigned { .. } => {}
            }
        }
    }
}

/// Winner announcements waiting for their wheel to stop spinning.
struct PendingReveals {
    tasks: Vec<JoinHandle<String>>,
}

impl PendingReveals {
    fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    fn schedule(&mut self, outcome: DrawOutcome) {
        CliDisplay::print_spinning(&outcome);

        let delay = Duration::try_from_secs_f64(outcome.tempo_rotacao).unwrap_or_default();

        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            CliDisplay::print_winner(&outcome.vencedor);
            outcome.vencedor
        }));
    }

    /// Waits until every scheduled winner has been printed.
    async fn finish(self) -> Vec<String> {
        let mut winners = Vec::new();

        for task in self.tasks {
            if let Ok(winner) = task.await {
                winners.push(winner);
            }
        }

        winners
    }
}

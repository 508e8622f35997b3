use core::error::Error;

use rand::rng;
use shared::{
    payload::{ChatMessage, WheelConfig, WheelItem, to_payload},
    protocol::ClientMessage,
};
use tokio::io::{AsyncBufReadExt, BufReader, stdin};

use crate::{
    cli_display::CliDisplay,
    client::{WsStream, read_server_message, send_command},
    draw,
};

#[derive(Debug, Clone, PartialEq)]
pub enum OrganizerCommand {
    Empty,
    Exit,
    Show,
    Sync,
    Draw,
    Title(String),
    Time(f64),
    Background(String),
    AddItem(WheelItem),
    RemoveItem(usize),
    Say(String),
}

impl OrganizerCommand {
    /// Parses one prompt line. `Err` carries the message to show the user.
    pub fn parse(input: &str) -> Result<Self, String> {
        match input {
            "" => Ok(OrganizerCommand::Empty),
            "exit" => Ok(OrganizerCommand::Exit),
            "show" => Ok(OrganizerCommand::Show),
            "sync" => Ok(OrganizerCommand::Sync),
            "draw" => Ok(OrganizerCommand::Draw),

            "title" => Err("Usage: title <text>".to_string()),
            command if command.starts_with("title ") => {
                Ok(OrganizerCommand::Title(argument(command, "title ").to_string()))
            }

            "time" => Err("Usage: time <seconds>".to_string()),
            command if command.starts_with("time ") => {
                match argument(command, "time ").parse::<f64>() {
                    Ok(seconds) if seconds.is_finite() && seconds > 0.0 => {
                        Ok(OrganizerCommand::Time(seconds))
                    }
                    _ => Err("Usage: time <seconds>, with seconds greater than 0".to_string()),
                }
            }

            "background" => Err("Usage: background <colour>".to_string()),
            command if command.starts_with("background ") => Ok(OrganizerCommand::Background(
                argument(command, "background ").to_string(),
            )),

            "add item" => Err("Usage: add item <name> <quantity>".to_string()),
            command if command.starts_with("add item ") => {
                let usage = "Usage: add item <name> <quantity>, with quantity at least 1";

                let (name, quantity) = argument(command, "add item ")
                    .rsplit_once(' ')
                    .ok_or_else(|| usage.to_string())?;

                match quantity.parse::<u32>() {
                    Ok(quantity) if quantity > 0 && !name.trim().is_empty() => Ok(
                        OrganizerCommand::AddItem(WheelItem::new(name.trim(), quantity)),
                    ),
                    _ => Err(usage.to_string()),
                }
            }

            "remove item" => Err("Usage: remove item <n>".to_string()),
            command if command.starts_with("remove item ") => {
                match argument(command, "remove item ").parse::<usize>() {
                    Ok(position) if position > 0 => Ok(OrganizerCommand::RemoveItem(position)),
                    _ => Err("Usage: remove item <n>, counting from 1".to_string()),
                }
            }

            "say" => Err("Usage: say <text>".to_string()),
            command if command.starts_with("say ") => {
                Ok(OrganizerCommand::Say(argument(command, "say ").to_string()))
            }

            _ => Err("Unknown command".to_string()),
        }
    }
}

fn argument<'a>(command: &'a str, prefix: &str) -> &'a str {
    command[prefix.len()..].trim()
}

pub struct OrganizerInterface;

impl OrganizerInterface {
    pub async fn run(
        mut ws_stream: WsStream,
        room_id: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut config = WheelConfig {
            itens: vec![WheelItem::new("Prémio 1", 10), WheelItem::new("Prémio 2", 5)],
            ..WheelConfig::default()
        };
        let mut rotation = 0.0;

        let mut lines = BufReader::new(stdin()).lines();

        CliDisplay::print_organizer_help();
        CliDisplay::print_config(&config);

        loop {
            CliDisplay::print_prompt()?;

            tokio::select! {

                result = lines.next_line() => {

                    let line = match result? {
                        Some(line) => line,
                        None => return Ok(()),
                    };

                    match OrganizerCommand::parse(line.trim()) {
                        Ok(OrganizerCommand::Exit) => {
                            println!("Exiting...");
                            ws_stream.close(None).await?;
                            return Ok(());
                        }
                        Ok(command) => {
                            Self::handle_command(command, &mut config, &mut rotation, room_id, &mut ws_stream).await?;
                        }
                        Err(message) => eprintln!("{}", message),
                    }
                }

                result = read_server_message(&mut ws_stream) => {

                    if result?.is_none() {
                        CliDisplay::print_connection_lost();
                        return Ok(());
                    }
                }
            }
        }
    }

    async fn handle_command(
        command: OrganizerCommand,
        config: &mut WheelConfig,
        rotation: &mut f64,
        room_id: &str,
        ws_stream: &mut WsStream,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        match command {
            OrganizerCommand::Empty | OrganizerCommand::Exit => {}
            OrganizerCommand::Show => CliDisplay::print_config(config),
            OrganizerCommand::Sync => {
                let command = ClientMessage::SyncConfig {
                    id_sorteio: room_id.to_string(),
                    payload: to_payload(&*config)?,
                };
                send_command(ws_stream, &command).await?;
                println!("Configuration published.");
            }
            OrganizerCommand::Draw => {
                let result = draw::run_draw(config, *rotation, &mut rng());

                let outcome = match result {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        eprintln!("{}", e);
                        return Ok(());
                    }
                };

                *rotation = outcome.angulo_final;

                let command = ClientMessage::StartDraw {
                    id_sorteio: room_id.to_string(),
                    payload: to_payload(&outcome)?,
                };
                send_command(ws_stream, &command).await?;

                CliDisplay::print_spinning(&outcome);
                CliDisplay::print_winner(&outcome.vencedor);
            }
            OrganizerCommand::Title(title) => {
                config.titulo = title;
                println!("Title updated. Type 'sync' to publish.");
            }
            OrganizerCommand::Time(seconds) => {
                config.tempo_rotacao = seconds;
                println!("Spin duration updated. Type 'sync' to publish.");
            }
            OrganizerCommand::Background(colour) => {
                config.cor_fundo = colour;
                println!("Background updated. Type 'sync' to publish.");
            }
            OrganizerCommand::AddItem(item) => {
                println!("Added '{}'. Type 'sync' to publish.", item.nome);
                config.itens.push(item);
            }
            OrganizerCommand::RemoveItem(position) => {
                if position > config.itens.len() {
                    eprintln!("There is no item {}.", position);
                } else {
                    let removed = config.itens.remove(position - 1);
                    println!("Removed '{}'. Type 'sync' to publish.", removed.nome);
                }
            }
            OrganizerCommand::Say(text) => {
                let command = ClientMessage::SendMessage {
                    id_sorteio: room_id.to_string(),
                    payload: to_payload(&ChatMessage { texto: text })?,
                };
                send_command(ws_stream, &command).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_commands() {
        assert_eq!(OrganizerCommand::parse(""), Ok(OrganizerCommand::Empty));
        assert_eq!(OrganizerCommand::parse("sync"), Ok(OrganizerCommand::Sync));
        assert_eq!(OrganizerCommand::parse("draw"), Ok(OrganizerCommand::Draw));
        assert_eq!(OrganizerCommand::parse("exit"), Ok(OrganizerCommand::Exit));
    }

    #[test]
    fn keeps_spaces_and_case_in_text_arguments() {
        assert_eq!(
            OrganizerCommand::parse("title Grande Sorteio de Natal"),
            Ok(OrganizerCommand::Title("Grande Sorteio de Natal".to_string()))
        );
        assert_eq!(
            OrganizerCommand::parse("say Boa sorte a todos!"),
            Ok(OrganizerCommand::Say("Boa sorte a todos!".to_string()))
        );
    }

    #[test]
    fn add_item_takes_quantity_from_last_word() {
        assert_eq!(
            OrganizerCommand::parse("add item Vale Presente 50 3"),
            Ok(OrganizerCommand::AddItem(WheelItem::new("Vale Presente 50", 3)))
        );
        assert!(OrganizerCommand::parse("add item Bicicleta").is_err());
        assert!(OrganizerCommand::parse("add item Bicicleta 0").is_err());
        assert!(OrganizerCommand::parse("add item Bicicleta lots").is_err());
    }

    #[test]
    fn numeric_arguments_are_validated() {
        assert_eq!(OrganizerCommand::parse("time 7.5"), Ok(OrganizerCommand::Time(7.5)));
        assert!(OrganizerCommand::parse("time -1").is_err());
        assert!(OrganizerCommand::parse("time NaN").is_err());
        assert_eq!(
            OrganizerCommand::parse("remove item 2"),
            Ok(OrganizerCommand::RemoveItem(2))
        );
        assert!(OrganizerCommand::parse("remove item 0").is_err());
    }

    #[test]
    fn missing_arguments_show_usage() {
        assert_eq!(
            OrganizerCommand::parse("title"),
            Err("Usage: title <text>".to_string())
        );
        assert!(OrganizerCommand::parse("say").is_err());
        assert_eq!(
            OrganizerCommand::parse("spin it"),
            Err("Unknown command".to_string())
        );
    }
}

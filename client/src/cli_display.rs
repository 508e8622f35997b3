use crossterm::{
    cursor, execute,
    style::Stylize,
    terminal::{Clear, ClearType},
};
use shared::{
    payload::{DrawOutcome, WheelConfig},
    protocol::Role,
};
use std::io::{self, Write, stdout};

pub const PROMPT_STR: &str = "> ";

pub struct CliDisplay;

impl CliDisplay {
    pub fn print_connected_message(server_url: &str, room_id: &str, role: Role) {
        let role_name = match role {
            Role::Organizer => "organizer",
            Role::Viewer => "viewer",
        };

        println!(
            "Connected to {} in room '{}' as {}.",
            server_url,
            room_id,
            role_name.bold()
        );
    }

    pub fn print_prompt() -> io::Result<()> {
        print!("{}", PROMPT_STR);
        stdout().flush()
    }

    pub fn print_organizer_help() {
        println!("Commands:");
        println!("  * title <text>            set the wheel title");
        println!("  * time <seconds>          set the spin duration");
        println!("  * background <colour>     set the background colour");
        println!("  * add item <name> <qty>   add a prize with its weight");
        println!("  * remove item <n>         remove the n-th prize");
        println!("  * show                    print the current wheel");
        println!("  * sync                    publish the wheel to viewers");
        println!("  * say <text>              send a chat message to viewers");
        println!("  * draw                    spin the wheel");
        println!("  * exit");
    }

    pub fn print_config(config: &WheelConfig) {
        let total = config.total_weight();

        println!("{}", config.titulo.as_str().bold());
        println!(
            "  spin: {}s, background: {}",
            config.tempo_rotacao, config.cor_fundo
        );

        if config.itens.is_empty() {
            println!("  (no items)");
        }

        for (index, item) in config.itens.iter().enumerate() {
            let chance = if total == 0 {
                0.0
            } else {
                item.quantidade as f64 * 100.0 / total as f64
            };

            println!(
                "  {}. {} x{} ({:.1}%)",
                index + 1,
                item.nome,
                item.quantidade,
                chance
            );
        }
    }

    pub fn print_chat_message(text: &str) {
        println!("{} {}", "[organizer]".magenta(), text);
    }

    pub fn print_spinning(outcome: &DrawOutcome) {
        println!(
            "Spinning to {:.1}° for {}s...",
            outcome.angulo_final, outcome.tempo_rotacao
        );
    }

    pub fn print_winner(winner: &str) {
        println!("{} {}!", "Winner:".green().bold(), winner.green().bold());
    }

    pub fn print_configurator_left() {
        println!("{}", "The organizer left. The room has been closed.".yellow());
    }

    pub fn print_connection_lost() {
        let mut stdout = stdout();

        let _ = execute!(
            stdout,
            Clear(ClearType::CurrentLine),
            cursor::MoveToColumn(0)
        );

        let _ = writeln!(stdout, "The connection to the server was lost.");
        let _ = stdout.flush();
    }
}

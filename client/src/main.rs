mod cli_display;
mod client;
mod draw;
mod organizer_interface;
mod viewer_interface;

use clap::Parser;
use shared::DEFAULT_PORT;

use crate::client::Client;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Draw room to join; the first to join becomes its organizer
    room: String,

    #[arg(short, long, default_value = "127.0.0.1")]
    server_address: String,

    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = Client::run(&args.server_address, args.port, &args.room).await {
        eprintln!("{}", e);
    }
}

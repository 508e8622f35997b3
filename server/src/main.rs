use log::{error, info};
use server::relay::{Relay, RelayConfig};
use shared::DEFAULT_PORT;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Only accept SYNC_CONFIG and START_DRAW from the organizer of the named room
    #[arg(long)]
    enforce_organizer: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RelayConfig {
        bind_addr: format!("{}:{}", args.host, args.port),
        enforce_organizer_authority: args.enforce_organizer,
    };

    let relay = match Relay::bind(config.clone()).await {
        Ok(relay) => relay,
        Err(e) => {
            error!("Error binding: {}", e);
            return;
        }
    };

    info!("Relay listening on {}", config.bind_addr);

    if let Err(e) = relay.listen().await {
        error!("{}", e);
    }
}

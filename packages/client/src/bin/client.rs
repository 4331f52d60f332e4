//! CLI chat client for the encrypted relay.
//!
//! Connects to a relay server, joins rooms with `/join <room>` or
//! `/login <user> <password> <room>`, and sends every plain input line as
//! an encrypted message. Automatically reconnects on disconnection
//! (max 5 attempts with 5 second interval) and re-enters the current room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin client -- --name Alice
//! cargo run --bin client -- -n Bob -r lobby
//! ```

use clap::Parser;

use mitsudan_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "CLI chat client for the encrypted relay", long_about = None)]
struct Args {
    /// Display name shown to other room members (not unique)
    #[arg(short = 'n', long)]
    name: String,

    /// Room to enter on connect; without it, use /join after connecting
    #[arg(short = 'r', long)]
    room: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3500/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = mitsudan_client::run_client(args.url, args.name, args.room).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
